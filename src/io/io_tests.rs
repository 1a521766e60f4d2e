use std::env;
use std::fs;

use crate::auxiliary::lattice::UnitCell;
use crate::io::{
    read_ssgsym_binary, read_ssgsym_yaml, write_ssgsym_binary, write_ssgsym_yaml, SsgSymFileType,
};

#[test]
fn test_io_file_type_extensions() {
    assert_eq!(SsgSymFileType::Grp.ext(), "ssgsym.grp");
    assert_eq!(SsgSymFileType::Ref.ext(), "ssgsym.ref");
    assert_eq!(SsgSymFileType::Ssg.ext(), "ssgsym.ssg");
}

#[test]
fn test_io_binary_and_yaml_round_trip() {
    let cell = UnitCell::new([5.1, 6.2, 7.3], [90.0, 101.5, 90.0]).unwrap();
    let name = env::temp_dir().join(format!("ssgsym_io_test_{}", std::process::id()));

    write_ssgsym_binary(&name, SsgSymFileType::Grp, &cell).unwrap();
    let read: UnitCell = read_ssgsym_binary(&name, SsgSymFileType::Grp).unwrap();
    assert_eq!(read, cell);

    write_ssgsym_yaml(&name, &cell).unwrap();
    let yaml_path = name.with_extension("yml");
    let read: UnitCell = read_ssgsym_yaml(&yaml_path).unwrap();
    assert_eq!(read, cell);

    fs::remove_file(name.with_extension(SsgSymFileType::Grp.ext())).unwrap();
    fs::remove_file(yaml_path).unwrap();

    assert!(read_ssgsym_binary::<UnitCell, _>(&name, SsgSymFileType::Ref).is_err());
}
