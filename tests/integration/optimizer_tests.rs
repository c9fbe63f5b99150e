use packsize::{PackError, PackOptimizer};

use crate::fixture::Backends;

#[test]
fn known_orders_against_default_catalog() {
    let backends = Backends::with_defaults();
    let optimizer = PackOptimizer::new();
    let cases: &[(i64, &[(u32, u32)])] = &[
        (1, &[(250, 1)]),
        (250, &[(250, 1)]),
        (251, &[(500, 1)]),
        (501, &[(500, 1), (250, 1)]),
        (12001, &[(5000, 2), (2000, 1), (250, 1)]),
    ];

    for catalog in &backends.catalogs {
        for &(amount, expected) in cases {
            let report = optimizer.calculate(catalog.as_ref(), amount).unwrap().report;
            let lines: Vec<(u32, u32)> = report
                .packages
                .iter()
                .map(|line| (line.size, line.quantity))
                .collect();
            assert_eq!(lines, expected, "order {amount} on {}", catalog.backend());
        }
    }
}

#[test]
fn catalog_changes_are_seen_by_the_next_calculation() {
    let backends = Backends::with_defaults();
    let optimizer = PackOptimizer::new();
    for catalog in &backends.catalogs {
        let quarter = catalog
            .list()
            .unwrap()
            .into_iter()
            .find(|entry| entry.size == 250)
            .unwrap();
        catalog.delete(quarter.id).unwrap();

        let report = optimizer.calculate(catalog.as_ref(), 1).unwrap().report;
        assert_eq!(report.quantity(500), 1);
        assert_eq!(report.waste, 499);
    }
}

#[test]
fn empty_catalog_and_bad_amounts_fail() {
    let backends = Backends::empty();
    let optimizer = PackOptimizer::new();
    for catalog in &backends.catalogs {
        assert!(matches!(
            optimizer.calculate(catalog.as_ref(), 10),
            Err(PackError::EmptyCatalog)
        ));
        catalog.create(5).unwrap();
        assert!(matches!(
            optimizer.calculate(catalog.as_ref(), 0),
            Err(PackError::InvalidOrder(_))
        ));
        assert!(matches!(
            optimizer.calculate(catalog.as_ref(), -3),
            Err(PackError::InvalidOrder(_))
        ));
    }
}
