use packsize::PackError;
use uuid::Uuid;

use crate::fixture::Backends;

#[test]
fn backends_agree_on_descending_sizes() {
    let backends = Backends::with_defaults();
    for catalog in &backends.catalogs {
        assert_eq!(
            catalog.sizes_descending().unwrap(),
            vec![5000, 2000, 1000, 500, 250],
            "backend {}",
            catalog.backend()
        );
        assert_eq!(catalog.len().unwrap(), 5);
    }
}

#[test]
fn duplicate_sizes_are_rejected_by_every_backend() {
    let backends = Backends::with_defaults();
    for catalog in &backends.catalogs {
        let err = catalog.create(500).unwrap_err();
        assert!(matches!(err, PackError::DuplicateSize(500)), "{}", catalog.backend());

        let err = catalog.create_many(&[750, 1000]).unwrap_err();
        assert!(matches!(err, PackError::DuplicateSize(1000)));
        assert!(!catalog.sizes_descending().unwrap().contains(&750));
    }
}

#[test]
fn update_cannot_collide_with_another_entry() {
    let backends = Backends::empty();
    for catalog in &backends.catalogs {
        let small = catalog.create(250).unwrap();
        catalog.create(500).unwrap();

        let err = catalog.update(small.id, 500).unwrap_err();
        assert!(matches!(err, PackError::DuplicateSize(500)));

        let updated = catalog.update(small.id, 300).unwrap();
        assert_eq!(updated.size, 300);
        assert_eq!(updated.created_at, small.created_at);
        assert_eq!(catalog.get(small.id).unwrap().size, 300);
    }
}

#[test]
fn missing_entries_report_not_found() {
    let backends = Backends::empty();
    let id = Uuid::new_v4();
    for catalog in &backends.catalogs {
        assert!(matches!(catalog.get(id), Err(PackError::PackageNotFound(_))));
        assert!(matches!(catalog.update(id, 10), Err(PackError::PackageNotFound(_))));
        assert!(matches!(catalog.delete(id), Err(PackError::PackageNotFound(_))));
    }
}

#[test]
fn delete_returns_the_removed_entry() {
    let backends = Backends::with_defaults();
    for catalog in &backends.catalogs {
        let entry = catalog
            .list()
            .unwrap()
            .into_iter()
            .find(|entry| entry.size == 2000)
            .unwrap();
        let removed = catalog.delete(entry.id).unwrap();
        assert_eq!(removed, entry);
        assert_eq!(catalog.sizes_descending().unwrap(), vec![5000, 1000, 500, 250]);
    }
}
