use std::env;
use std::fs;

use crate::drivers::space_group::{SpaceGroupDriver, SpaceGroupParams, SpaceGroupResult};
use crate::drivers::SsgSymDriver;
use crate::group::cache::GroupCache;
use crate::group::group_classes::LaueClass;
use crate::group::test_groups::test_resolver;
use crate::io::{read_ssgsym_binary, SsgSymFileType};

#[test]
fn test_drivers_space_group_p21c() {
    let resolver = test_resolver();
    let cache = GroupCache::new();
    let params = SpaceGroupParams::builder()
        .symbol("P 21/c".to_string())
        .build()
        .unwrap();
    let mut driver = SpaceGroupDriver::builder()
        .parameters(&params)
        .resolver(&resolver)
        .cache(&cache)
        .build()
        .unwrap();
    assert!(driver.result().is_err());
    driver.run().unwrap();
    let result = driver.result().unwrap();
    assert_eq!(result.descriptor.laue_class, LaueClass::TwoOverM);
    assert_eq!(result.group.len(), 4);
    assert!(result.group.is_closed());
    let text = result.to_string();
    assert!(text.contains("Space group: P 21/c"));
    assert!(text.contains("Operators of P 21/c (4):"));
    assert_eq!(cache.n_expansions(), 1);
}

#[test]
fn test_drivers_space_group_hides_operators() {
    let resolver = test_resolver();
    let cache = GroupCache::new();
    let params = SpaceGroupParams::builder()
        .symbol("F m -3 m".to_string())
        .write_operators(false)
        .build()
        .unwrap();
    let mut driver = SpaceGroupDriver::builder()
        .parameters(&params)
        .resolver(&resolver)
        .cache(&cache)
        .build()
        .unwrap();
    driver.run().unwrap();
    let result = driver.result().unwrap();
    assert_eq!(result.group.len(), 192);
    assert!(!result.to_string().contains("Operators of"));
}

#[test]
fn test_drivers_space_group_unknown_symbol() {
    let resolver = test_resolver();
    let cache = GroupCache::new();
    let params = SpaceGroupParams::builder()
        .symbol("P 42/n n m".to_string())
        .build()
        .unwrap();
    let mut driver = SpaceGroupDriver::builder()
        .parameters(&params)
        .resolver(&resolver)
        .cache(&cache)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(err.to_string().contains("P 42/n n m"));
    assert!(driver.result().is_err());
}

#[test]
fn test_drivers_space_group_saves_result() {
    let resolver = test_resolver();
    let cache = GroupCache::new();
    let name = env::temp_dir()
        .join(format!("ssgsym_space_group_{}", std::process::id()))
        .to_string_lossy()
        .to_string();
    let params = SpaceGroupParams::builder()
        .symbol("C 2/c".to_string())
        .result_save_name(Some(name.clone()))
        .build()
        .unwrap();
    let mut driver = SpaceGroupDriver::builder()
        .parameters(&params)
        .resolver(&resolver)
        .cache(&cache)
        .build()
        .unwrap();
    driver.run().unwrap();
    let saved: SpaceGroupResult = read_ssgsym_binary(&name, SsgSymFileType::Grp).unwrap();
    assert_eq!(saved.group, driver.result().unwrap().group);
    fs::remove_file(format!("{name}.{}", SsgSymFileType::Grp.ext())).unwrap();
}
