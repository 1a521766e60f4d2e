use nalgebra::Vector3;

use crate::drivers::site_analysis::{
    uij_violations, AtomSite, SiteAnalysisDriver, SiteAnalysisParams,
};
use crate::drivers::SsgSymDriver;
use crate::group::expansion::ExpandedOperator;
use crate::group::test_groups::test_group;
use crate::site::site_symmetry::ClassificationPrecision;
use crate::symmetry::rotation_table::pack_rotation;
use crate::symmetry::symmetry_operator::SymmetryOperator;

#[test]
fn test_drivers_site_analysis_c2c() {
    let group = test_group("C 2/c");
    let atoms = vec![
        AtomSite::new("Fe1", [0.25, 0.25, 0.5]),
        AtomSite::new("O1", [0.1, 0.2, 0.3]),
        AtomSite::new("O2", [0.0, 0.3, 0.25]),
    ];
    let params = SiteAnalysisParams::builder()
        .write_orbits(true)
        .build()
        .unwrap();
    let mut driver = SiteAnalysisDriver::builder()
        .parameters(&params)
        .group(&group)
        .atoms(&atoms)
        .build()
        .unwrap();
    driver.run().unwrap();
    let result = driver.result().unwrap();

    let labels = result
        .sites
        .iter()
        .map(|analysis| analysis.site.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["-1", "1", "2(y)"]);
    let multiplicities = result
        .sites
        .iter()
        .map(|analysis| analysis.site.multiplicity)
        .collect::<Vec<_>>();
    assert_eq!(multiplicities, vec![4, 8, 4]);
    assert_eq!(result.n_atoms_in_cell(), 16);

    for analysis in result.sites.iter() {
        assert_eq!(analysis.orbit.n_unique(), analysis.site.multiplicity);
        assert_eq!(analysis.constraints.label, analysis.site.label);
    }
    assert_eq!(result.sites[0].constraints.n_free_position(), 0);
    assert_eq!(result.sites[1].constraints.n_free_position(), 3);
    assert_eq!(result.sites[2].constraints.n_free_position(), 1);
    assert_eq!(result.sites[2].constraints.n_free_uij(), 4);

    let text = result.to_string();
    assert!(text.contains("Atoms in the unit cell of C 2/c: 16"));
    assert!(text.contains("Orbits"));
}

#[test]
fn test_drivers_site_analysis_carries_uij() {
    let group = test_group("P 2/c");
    let uij = [0.01, 0.02, 0.03, 0.0, 0.004, 0.0];
    let atoms = vec![AtomSite {
        label: "Zn1".to_string(),
        position: [0.1, 0.2, 0.3],
        uij: Some(uij),
    }];
    let params = SiteAnalysisParams::default();
    let mut driver = SiteAnalysisDriver::builder()
        .parameters(&params)
        .group(&group)
        .atoms(&atoms)
        .build()
        .unwrap();
    driver.run().unwrap();
    let analysis = &driver.result().unwrap().sites[0];
    assert!(analysis.orbit.members.iter().all(|member| member.uij.is_some()));
    assert_eq!(analysis.orbit.members[0].uij, Some(uij));
}

#[test]
fn test_drivers_site_analysis_uij_violations() {
    let group = test_group("P 2/c");
    let site = crate::site::site_symmetry::classify_site(
        &Vector3::new(0.0, 0.3, 0.25),
        &group,
        2.0e-4,
    );
    let constraints = site.constraints();
    assert!(uij_violations(&constraints, &[0.01, 0.02, 0.03, 0.0, 0.004, 0.0]).is_empty());
    assert_eq!(
        uij_violations(&constraints, &[0.01, 0.02, 0.03, 0.005, 0.004, 0.0]),
        vec!["U12"]
    );
}

#[test]
fn test_drivers_site_analysis_degraded_sites() {
    let mut group = test_group("P 1");
    for rows in ["x, -y, -z", "y, x, -z"] {
        let operator: SymmetryOperator = rows.parse().unwrap();
        group.operators.push(ExpandedOperator {
            packed_id: pack_rotation(&operator.rotation),
            operator,
            generator_index: group.operators.len(),
            centering_index: 0,
            inverted: false,
            cell_offset: Vector3::zeros(),
        });
    }
    let atoms = vec![AtomSite::new("X1", [0.0, 0.0, 0.0])];

    let params = SiteAnalysisParams::default();
    let mut driver = SiteAnalysisDriver::builder()
        .parameters(&params)
        .group(&group)
        .atoms(&atoms)
        .build()
        .unwrap();
    driver.run().unwrap();
    let site = &driver.result().unwrap().sites[0].site;
    assert_eq!(site.precision, ClassificationPrecision::Degraded);

    let params = SiteAnalysisParams::builder()
        .require_exact(true)
        .build()
        .unwrap();
    let mut driver = SiteAnalysisDriver::builder()
        .parameters(&params)
        .group(&group)
        .atoms(&atoms)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(err.to_string().contains("X1"));
    assert!(driver.result().is_err());
}
