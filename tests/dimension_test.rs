use dimgrid::dimension::{
    Dimension, DimensionAction, DimensionKind, ListIntent, Route, available_actions,
};

fn standard() -> Dimension {
    Dimension::new("d1", "Region", DimensionKind::Standard)
}

#[test]
fn test_capability_table() {
    use DimensionAction::*;

    assert_eq!(
        available_actions(&standard()),
        vec![View, Rename, Reload, Delete, Export, Link]
    );

    let time = Dimension::new("t1", "Calendar", DimensionKind::TimeHierarchy);
    assert_eq!(
        available_actions(&time),
        vec![View, Rename, Reload, Delete, Export, Link, Configure]
    );

    let gl = Dimension::system("gl", "GL Account", DimensionKind::GlAccount);
    assert_eq!(available_actions(&gl), vec![View, ViewHierarchy, Download]);

    // A non-system GL account row gets the standard menu
    let custom_gl = Dimension::new("g2", "Custom GL", DimensionKind::GlAccount);
    assert!(!ViewHierarchy.is_available(&custom_gl));
    assert!(Rename.is_available(&custom_gl));
    println!("✓ Menu entries follow the capability table");
}

#[test]
fn test_remote_actions() {
    let remote: Vec<DimensionAction> = DimensionAction::ALL
        .into_iter()
        .filter(|a| a.is_remote())
        .collect();
    assert_eq!(
        remote,
        vec![
            DimensionAction::Rename,
            DimensionAction::Reload,
            DimensionAction::Delete,
            DimensionAction::Export,
            DimensionAction::Download,
        ]
    );
    assert_eq!(DimensionAction::ViewHierarchy.label(), "View hierarchy");
    println!("✓ Remote actions are flagged");
}

#[test]
fn test_list_intents() {
    let mut list = vec![
        standard(),
        Dimension::new("d2", "Product", DimensionKind::Standard),
    ];

    let rename = ListIntent::RenameById {
        id: "d2".to_string(),
        name: "Products".to_string(),
    };
    assert!(rename.apply(&mut list));
    assert_eq!(list[1].name, "Products");

    let mut refreshed = standard();
    refreshed.member_count = Some(12);
    assert!(ListIntent::ReplaceById { dimension: refreshed }.apply(&mut list));
    assert_eq!(list[0].member_count, Some(12));

    assert!(ListIntent::RemoveById { id: "d1".to_string() }.apply(&mut list));
    assert_eq!(list.len(), 1);
    assert!(!ListIntent::RemoveById { id: "d1".to_string() }.apply(&mut list));
    assert_eq!(list.len(), 1);
    println!("✓ List intents apply by id");
}

#[test]
fn test_dimension_deserialize() {
    let json = r#"[
        {"id": "1", "name": "Cal", "type": "time"},
        {"id": "2", "name": "GL", "type": "gl_account", "is_system": true, "member_count": 310},
        {"id": "3", "name": "Plain", "updated_at": "2024-05-01T10:00:00Z"}
    ]"#;
    let dims: Vec<Dimension> = serde_json::from_str(json).unwrap();

    assert_eq!(dims[0].kind, DimensionKind::TimeHierarchy);
    assert!(!dims[0].is_system);
    assert_eq!(dims[1].kind, DimensionKind::GlAccount);
    assert!(dims[1].is_system);
    assert_eq!(dims[1].member_count, Some(310));
    assert_eq!(dims[2].kind, DimensionKind::Standard);
    assert!(dims[2].updated_at.is_some());
    println!("✓ Server dimensions deserialize with type aliases and defaults");
}

#[test]
fn test_intent_and_route_serialization() {
    let intent = ListIntent::RemoveById { id: "d9".to_string() };
    let value = serde_json::to_value(&intent).unwrap();
    assert_eq!(value, serde_json::json!({"op": "remove_by_id", "id": "d9"}));

    let route = Route::LinkDimension("d9".to_string());
    let value = serde_json::to_value(&route).unwrap();
    assert_eq!(value, serde_json::json!({"route": "link_dimension", "target": "d9"}));
    println!("✓ Intents and routes serialize for the view");
}
