//! Backend-agnostic scenarios run against every [`ContentStore`].

use medayu_core::model::{AnnouncementFields, ProfileFields, SlideFields};
use medayu_core::{Ordinal, ProfileKind, SlideId, MAX_SLIDES};

use crate::error::StorageError;
use crate::traits::ContentStore;

fn slide(name: &str, ordinal: u8) -> SlideFields {
    SlideFields {
        image_file_name: name.to_string(),
        ordinal: Ordinal::new(ordinal as i64).unwrap(),
    }
}

/// Inserts one slide per ordinal, named `slide-<n>.webp`.
pub fn insert_slides<S: ContentStore>(store: &mut S, ordinals: &[u8]) -> Vec<SlideId> {
    ordinals
        .iter()
        .map(|o| {
            store
                .insert_slide(&slide(&format!("slide-{}.webp", o), *o))
                .unwrap()
        })
        .collect()
}

pub fn slide_crud<S: ContentStore>(mut store: S) {
    let ids = insert_slides(&mut store, &[5, 2]);
    assert_eq!(store.count_slides().unwrap(), 2);

    // Listing is ordered by ordinal, not insertion.
    let listed: Vec<u8> = store
        .list_slides()
        .unwrap()
        .iter()
        .map(|s| s.ordinal.get())
        .collect();
    assert_eq!(listed, vec![2, 5]);
    let used: Vec<u8> = store
        .used_ordinals()
        .unwrap()
        .iter()
        .map(|o| o.get())
        .collect();
    assert_eq!(used, vec![2, 5]);

    store.update_slide(ids[0], &slide("new.webp", 7)).unwrap();
    let updated = store.get_slide(ids[0]).unwrap().unwrap();
    assert_eq!(updated.image_file_name, "new.webp");
    assert_eq!(updated.ordinal.get(), 7);

    // Keeping its own ordinal is not a conflict.
    store.update_slide(ids[0], &slide("again.webp", 7)).unwrap();

    assert!(store.delete_slide(ids[0]).unwrap());
    assert!(store.get_slide(ids[0]).unwrap().is_none());
    assert!(!store.delete_slide(ids[0]).unwrap());
    assert!(matches!(
        store.update_slide(ids[0], &slide("x.webp", 1)),
        Err(StorageError::SlideNotFound(_))
    ));
}

pub fn slide_constraints<S: ContentStore>(mut store: S) {
    insert_slides(&mut store, &[3]);
    assert!(matches!(
        store.insert_slide(&slide("dup.webp", 3)),
        Err(StorageError::OrdinalTaken(o)) if o.get() == 3
    ));

    let rest: Vec<u8> = (1..=MAX_SLIDES).filter(|o| *o != 3).collect();
    insert_slides(&mut store, &rest);
    assert_eq!(store.count_slides().unwrap(), MAX_SLIDES as u64);

    // The ninth insert fails on capacity before the ordinal is looked at.
    assert!(matches!(
        store.insert_slide(&slide("ninth.webp", 1)),
        Err(StorageError::CapacityExceeded { max: 8 })
    ));
    assert_eq!(store.count_slides().unwrap(), MAX_SLIDES as u64);
}

pub fn profile_kinds_are_isolated<S: ContentStore>(mut store: S) {
    let fields = ProfileFields {
        name: "Ibu Sari".into(),
        photo: "sari.webp".into(),
    };
    let supervisor = store
        .insert_profile(ProfileKind::Supervisor, &fields)
        .unwrap();
    store
        .insert_profile(
            ProfileKind::Partner,
            &ProfileFields {
                name: "Toko Buku".into(),
                photo: "toko.webp".into(),
            },
        )
        .unwrap();

    assert_eq!(store.list_profiles(ProfileKind::Supervisor).unwrap().len(), 1);
    assert_eq!(store.list_profiles(ProfileKind::Partner).unwrap().len(), 1);
    assert!(store.list_profiles(ProfileKind::Advisor).unwrap().is_empty());

    // A supervisor id is invisible through another kind.
    assert!(store
        .get_profile(ProfileKind::Advisor, supervisor)
        .unwrap()
        .is_none());
    assert!(matches!(
        store.update_profile(ProfileKind::Advisor, supervisor, &fields),
        Err(StorageError::ProfileNotFound { .. })
    ));
    assert!(!store
        .delete_profile(ProfileKind::Advisor, supervisor)
        .unwrap());

    store
        .update_profile(
            ProfileKind::Supervisor,
            supervisor,
            &ProfileFields {
                name: "Ibu Sari W.".into(),
                photo: "sari2.webp".into(),
            },
        )
        .unwrap();
    let got = store
        .get_profile(ProfileKind::Supervisor, supervisor)
        .unwrap()
        .unwrap();
    assert_eq!(got.name, "Ibu Sari W.");
    assert_eq!(got.photo, "sari2.webp");

    assert!(store
        .delete_profile(ProfileKind::Supervisor, supervisor)
        .unwrap());
    assert!(store.list_profiles(ProfileKind::Supervisor).unwrap().is_empty());
}

pub fn announcement_crud<S: ContentStore>(mut store: S) {
    let id = store
        .insert_announcement(&AnnouncementFields {
            title: "Libur".into(),
            body: "Perpustakaan tutup".into(),
            photo: None,
        })
        .unwrap();
    let got = store.get_announcement(id).unwrap().unwrap();
    assert_eq!(got.photo, None);

    store
        .update_announcement(
            id,
            &AnnouncementFields {
                title: "Libur panjang".into(),
                body: "Tutup seminggu".into(),
                photo: Some("libur.webp".into()),
            },
        )
        .unwrap();
    let listed = store.list_announcements().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Libur panjang");
    assert_eq!(listed[0].photo.as_deref(), Some("libur.webp"));

    assert!(store.delete_announcement(id).unwrap());
    assert!(store.get_announcement(id).unwrap().is_none());
}

pub fn manager_accounts<S: ContentStore>(mut store: S) {
    let id = store
        .insert_manager("Rina", "rina@medayu.org", "$2b$10$hash")
        .unwrap();
    assert!(matches!(
        store.insert_manager("Other", " rina@medayu.org ", "$2b$10$x"),
        Err(StorageError::DuplicateEmail(_))
    ));

    let found = store
        .find_manager_by_email("  rina@medayu.org")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    assert!(store
        .find_manager_by_email("nobody@medayu.org")
        .unwrap()
        .is_none());

    store.update_manager_password(id, "$2b$10$other").unwrap();
    assert_eq!(
        store.get_manager(id).unwrap().unwrap().password_hash,
        "$2b$10$other"
    );
}
