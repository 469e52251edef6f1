use crate::error::GenError;
use crate::java::ast::TypeRef;
use crate::java::builder::{marker, CompilationUnitBuilder, InterfaceBuilder};
use crate::java::imports::ImportSet;
use crate::java::{CompilationUnit, Modifier};
use crate::meta::EntityMeta;

use super::Policy;

/// Build `<Entity>Repository extends <Base><Entity, KeyType>`.
pub fn build(meta: &EntityMeta, policy: Policy) -> Result<CompilationUnit, GenError> {
    let ids = meta.require_id()?;
    let key_type = meta.key_type()?;

    let mut imports = ImportSet::new();
    imports.add("org.springframework.stereotype.Repository")?;
    imports.add(&meta.repository_super.import())?;
    if meta.packages.entity != meta.packages.repository {
        imports.add(&format!("{}.{}", meta.packages.entity, meta.class_name))?;
    }
    if policy.composite_key {
        if meta.packages.entity_key != meta.packages.repository {
            imports.add(&format!("{}.{}", meta.packages.entity_key, key_type))?;
        }
    } else {
        imports.extend(&ids[0].imports)?;
    }

    let base = TypeRef::generic(
        &meta.repository_super.name,
        vec![TypeRef::new(&meta.class_name)?, TypeRef::new(&key_type)?],
    )?;
    let interface = InterfaceBuilder::new(&[Modifier::Public], &meta.repository_name())
        .annotation(marker("Repository")?)
        .extend(base)
        .build()?;

    let unit = CompilationUnitBuilder::new()
        .package(&meta.packages.repository)?
        .import_set(imports)?
        .doc([format!("@author {}", meta.author)])?
        .interface(interface)
        .build()?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::java::render_unit;
    use crate::testutil::test_table;
    use crate::transform::{PartitionTransformer, SimpleTransformer, Transformer};

    #[test]
    fn test_simple_repository() {
        let config = Config::default();
        let meta = EntityMeta::from_table(&test_table("color_info", &["color_id_"], false), &config);
        let unit = SimpleTransformer.transform_repository(&meta).unwrap();
        let text = render_unit(&unit);
        insta::assert_snapshot!(text.trim_end(), @r"
        package com.a1stream.domain.repository;
        import org.springframework.stereotype.Repository;
        import com.a1stream.common.jpa.repository.ExtensionRepository;
        import com.a1stream.domain.entity.ColorInfo;
        /**
         * @author Entity Generator G3
         */
        @Repository
        public interface ColorInfoRepository extends ExtensionRepository<ColorInfo, Long> {
        }
        ");
    }

    #[test]
    fn test_partition_repository_uses_key_class() {
        let config = Config::default();
        let table = test_table("consumer_info", &["consumer_id_", "dealer_partition_"], true);
        let meta = EntityMeta::from_table(&table, &config);
        let unit = PartitionTransformer.transform_repository(&meta).unwrap();
        let interface = unit.interface().unwrap();
        let base = &interface.extends[0];
        assert_eq!(base.generics[1].simple_name(), "ConsumerInfoKey");
        assert_eq!(unit.package(), "com.a1stream.domain.repository.partition");
        let imports: Vec<&str> = unit.imports().collect();
        assert!(imports.contains(&"com.a1stream.domain.entity.partition.ConsumerInfo"));
        assert!(imports.contains(&"com.a1stream.domain.entity.partition.ConsumerInfoKey"));
    }
}
