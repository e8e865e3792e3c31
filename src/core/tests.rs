#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::command::{self, canvas, column, editor, memo, relationship, table};
    use crate::core::editor::{FocusType, MoveKey};
    use crate::core::{
        Change, Column, Command, Config, Database, Document, DocumentData, Field, Relationship,
        RelationshipPoint, RelationshipType, ShowKey, Store, Table, Target, generate_ddl,
        order_by_relationship,
    };

    fn users_orders() -> Document {
        Document::from_data(
            DocumentData::new()
                .with_table(
                    Table::new("users")
                        .with_id("users")
                        .with_position(50.0, 50.0)
                        .add_column(
                            Column::new("id", "int")
                                .with_id("users.id")
                                .primary_key()
                                .not_null(),
                        )
                        .add_column(Column::new("name", "string").with_id("users.name").not_null()),
                )
                .with_table(
                    Table::new("orders")
                        .with_id("orders")
                        .with_position(500.0, 80.0)
                        .add_column(Column::new("id", "int").with_id("orders.id").primary_key())
                        .add_column(
                            Column::new("user_id", "int")
                                .with_id("orders.user_id")
                                .not_null(),
                        ),
                )
                .with_relationship(
                    Relationship::new(
                        RelationshipType::OneN,
                        RelationshipPoint::new("users", vec!["users.id".into()]),
                        RelationshipPoint::new("orders", vec!["orders.user_id".into()]),
                    )
                    .with_id("users_orders"),
                ),
        )
        .unwrap()
    }

    fn store() -> Store {
        Store::with_document(users_orders(), &Config::default())
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    #[test]
    fn test_undo_restores_every_prior_state() {
        let mut store = store();
        let mut states = vec![store.document().clone()];

        let steps: Vec<Box<dyn Fn(&Document) -> Vec<Command>>> = vec![
            Box::new(|_: &Document| vec![canvas::move_canvas(120.0, 40.0)]),
            Box::new(|document: &Document| vec![table::add_table(document)]),
            Box::new(|_: &Document| vec![column::add_column("users")]),
            Box::new(|_: &Document| vec![table::change_table_name("users", "members")]),
            Box::new(|document: &Document| {
                vec![column::change_column_primary_key(
                    document,
                    "orders",
                    "orders.user_id",
                )]
            }),
            Box::new(|document: &Document| {
                relationship::add_relationship(document, RelationshipType::ZeroN, "orders", "users")
            }),
            Box::new(|document: &Document| vec![table::move_table(document, 30.0, -20.0, "orders")]),
            Box::new(|document: &Document| vec![canvas::change_canvas_show(document, ShowKey::ColumnComment)]),
            Box::new(|_: &Document| vec![column::remove_column("orders", vec!["orders.user_id".into()])]),
            Box::new(|document: &Document| vec![memo::add_memo(document)]),
            Box::new(|_: &Document| vec![table::remove_table(vec!["users".into()])]),
            Box::new(|_: &Document| vec![table::sort_table()]),
        ];

        for step in &steps {
            let commands = step(store.document());
            store.dispatch(commands).unwrap();
            states.push(store.document().clone());
        }
        assert_eq!(store.document().table_count(), 2);

        for expected in states.iter().rev().skip(1) {
            assert!(store.undo());
            assert_eq!(store.document(), expected);
        }
        assert!(!store.undo());

        for expected in states.iter().skip(1) {
            assert!(store.redo());
            assert_eq!(store.document(), expected);
        }
        assert!(!store.redo());
    }

    #[test]
    fn test_undo_restores_table_and_column_order() {
        let mut store = store();
        store
            .dispatch([table::remove_table(vec!["users".into()])])
            .unwrap();
        store
            .dispatch([column::remove_column("orders", vec!["orders.id".into()])])
            .unwrap();
        store.undo();
        store.undo();

        let ids: Vec<&str> = store.document().tables().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["users", "orders"]);
        let columns: Vec<&str> = store
            .document()
            .table("orders")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(columns, ["orders.id", "orders.user_id"]);
        assert!(store.document().relationship("users_orders").is_some());
    }

    #[test]
    fn test_new_batch_clears_redo() {
        let mut store = store();
        store.dispatch([canvas::move_canvas(10.0, 10.0)]).unwrap();
        store.undo();
        assert!(store.can_redo());
        store.dispatch([canvas::resize_canvas(3000.0, 3000.0)]).unwrap();
        assert!(!store.can_redo());
    }

    #[test]
    fn test_batch_is_one_undo_step() {
        let mut store = store();
        let before = store.document().clone();
        let commands = relationship::add_relationship(
            store.document(),
            RelationshipType::OneOnly,
            "users",
            "orders",
        );
        assert_eq!(commands.len(), 2);
        store.dispatch(commands).unwrap();
        assert_eq!(store.document().relationship_count(), 2);

        assert!(store.undo());
        assert_eq!(store.document(), &before);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_undo_is_exact_without_cached_widths() {
        let json = r#"{"tables":[{"id":"t","name":"users","columns":[{"id":"c","name":"id","data_type":"int"}]}]}"#;
        let document = Document::from_json(json).unwrap();
        let mut store = Store::with_document(document, &Config::default());
        let before = store.document().clone();

        store
            .dispatch([column::change_column_name("t", "c", "user_id")])
            .unwrap();
        assert!(store.undo());
        assert_eq!(store.document(), &before);

        store
            .dispatch([table::change_table_name("t", "users")])
            .unwrap();
        assert_eq!(store.document(), &before);
    }

    #[test]
    fn test_z_index_is_never_reused() {
        let mut store = Store::default();
        let add = |store: &mut Store| {
            let command = table::add_table(store.document());
            store.dispatch([command]).unwrap();
            let table = store.document().tables().last().unwrap();
            (table.id.clone(), table.ui.z_index)
        };

        let (_, a) = add(&mut store);
        let (b_id, b) = add(&mut store);
        store.dispatch([table::remove_table(vec![b_id])]).unwrap();
        let (_, c) = add(&mut store);
        assert!(a < b && b < c);
        assert_eq!(store.document().z_index(), c);

        assert!(store.undo());
        assert_eq!(store.document().z_index(), b);
        let json = store.document().to_json().unwrap();
        assert_eq!(Document::from_json(&json).unwrap().z_index(), b);
    }

    // ========================================================================
    // Stale references
    // ========================================================================

    #[test]
    fn test_stale_ids_change_nothing() {
        let mut store = store();
        let before = store.document().clone();
        let document = store.document().clone();

        let commands = vec![
            table::move_table(&document, 10.0, 10.0, "ghost"),
            table::select_table(&document, "ghost", false),
            table::change_table_name("ghost", "x"),
            table::change_table_comment("ghost", "x"),
            table::remove_table(vec!["ghost".into()]),
            column::add_column("ghost"),
            column::remove_column("users", vec!["ghost".into()]),
            column::change_column_name("users", "ghost", "x"),
            column::change_column_data_type(&document, "ghost", "ghost", "long"),
            column::change_column_not_null(&document, "users", "ghost"),
            column::move_column("users", vec!["ghost".into()], "users", "users.id"),
            relationship::remove_relationship(vec!["ghost".into()]),
            relationship::change_relationship_type("ghost", RelationshipType::ZeroOne),
            relationship::change_identification("ghost", true),
            memo::remove_memo(vec!["ghost".into()]),
            memo::select_memo(&document, "ghost", true),
            memo::change_memo_value("ghost", "x"),
            memo::resize_memo("ghost", 1.0, 1.0, 1.0, 1.0),
            editor::focus_table("ghost"),
            editor::focus_move_table(MoveKey::ArrowDown, false),
            editor::edit_table("ghost", FocusType::TableName),
        ];
        store.dispatch(commands).unwrap();
        assert_eq!(store.document(), &before);

        assert!(
            relationship::add_relationship(&document, RelationshipType::OneN, "ghost", "users")
                .is_empty()
        );
    }

    #[test]
    fn test_add_relationship_to_removed_table_is_noop() {
        let mut store = store();
        let add = relationship::add_relationship(
            store.document(),
            RelationshipType::OneN,
            "users",
            "orders",
        )
        .into_iter()
        .find(|command| matches!(command, Command::AddRelationship(_)))
        .unwrap();

        store
            .dispatch([table::remove_table(vec!["users".into()])])
            .unwrap();
        let before = store.document().clone();
        store.dispatch([add]).unwrap();
        assert_eq!(store.document(), &before);
        assert_eq!(store.document().relationship_count(), 0);
    }

    #[test]
    fn test_duplicate_ids_reject_batch() {
        let mut store = store();
        let duplicate = Command::AddTable(command::table::AddTable {
            table: Table::new("again").with_id("users"),
        });
        assert!(store.dispatch([canvas::move_canvas(5.0, 5.0), duplicate]).is_err());
        assert_eq!(store.document().canvas().scroll_top, 0.0);
    }

    // ========================================================================
    // Observation
    // ========================================================================

    #[test]
    fn test_relationship_list_notified_once_per_removed_relationship() {
        let mut store = store();
        let commands = relationship::add_relationship(
            store.document(),
            RelationshipType::OneN,
            "users",
            "orders",
        );
        store.dispatch(commands).unwrap();
        let mut relationship_ids: Vec<String> = store
            .document()
            .relationships()
            .map(|relationship| relationship.id.clone())
            .collect();
        assert_eq!(relationship_ids.len(), 2);

        let removed = Rc::new(RefCell::new(Vec::new()));
        let sink = removed.clone();
        store.observe(Target::Relationships, move |notification| {
            if let Change::Removed(id) = &notification.change {
                sink.borrow_mut().push(id.clone());
            }
        });
        store
            .dispatch([table::remove_table(vec!["users".into()])])
            .unwrap();

        let mut removed = removed.borrow().clone();
        removed.sort();
        relationship_ids.sort();
        assert_eq!(removed, relationship_ids);
        assert_eq!(store.document().relationship_count(), 0);
    }

    #[test]
    fn test_column_observers_are_keyed_by_table() {
        let document = Document::from_data(
            DocumentData::new()
                .with_table(
                    Table::new("a")
                        .with_id("a")
                        .add_column(Column::new("id", "int").with_id("id")),
                )
                .with_table(
                    Table::new("b")
                        .with_id("b")
                        .add_column(Column::new("id", "int").with_id("id")),
                ),
        )
        .unwrap();
        let mut store = Store::with_document(document, &Config::default());

        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        store.observe_field(Target::Column("a".into(), "id".into()), Field::Name, move |_| {
            *sink.borrow_mut() += 1
        });

        store
            .dispatch([column::change_column_name("b", "id", "b_id")])
            .unwrap();
        assert_eq!(*count.borrow(), 0);
        store
            .dispatch([column::change_column_name("a", "id", "a_id")])
            .unwrap();
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = store();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let handle = store.observe(Target::Canvas, move |_| *sink.borrow_mut() += 1);

        store.dispatch([canvas::move_canvas(1.0, 1.0)]).unwrap();
        assert_eq!(*count.borrow(), 2);
        assert!(store.unsubscribe(handle));
        store.dispatch([canvas::move_canvas(2.0, 2.0)]).unwrap();
        assert_eq!(*count.borrow(), 2);
        assert!(!store.unsubscribe(handle));
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    #[test]
    fn test_order_by_relationship_is_idempotent() {
        let tables: Vec<Table> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| Table::new(*id).with_id(*id))
            .collect();
        let edge = |start: &str, end: &str| {
            Relationship::new(
                RelationshipType::OneN,
                RelationshipPoint::new(start, vec![]),
                RelationshipPoint::new(end, vec![]),
            )
        };
        let relationships = vec![
            edge("a", "c"),
            edge("c", "b"),
            edge("b", "c"),
            edge("d", "e"),
            edge("e", "a"),
        ];

        let once = order_by_relationship(&tables, &relationships);
        let once_owned: Vec<Table> = once.iter().map(|table| (*table).clone()).collect();
        let twice = order_by_relationship(&once_owned, &relationships);
        let ids = |tables: &[&Table]| tables.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&once), ids(&twice));
        assert_eq!(once.len(), 5);
    }

    // ========================================================================
    // DDL
    // ========================================================================

    #[test]
    fn test_users_orders_mysql_ddl() {
        let ddl = generate_ddl(&users_orders(), Database::MySQL);
        let expected = "\
CREATE TABLE orders
(
  id      INT NOT NULL,
  user_id INT NOT NULL,
  PRIMARY KEY (id)
);

CREATE TABLE users
(
  id   INT          NOT NULL,
  name VARCHAR(255) NOT NULL,
  PRIMARY KEY (id)
);

ALTER TABLE orders
  ADD CONSTRAINT FK_users_TO_orders
    FOREIGN KEY (user_id)
    REFERENCES users (id);
";
        assert_eq!(ddl, expected);
    }

    #[test]
    fn test_tables_emitted_by_name() {
        let document = Document::from_data(
            DocumentData::new()
                .with_table(Table::new("b"))
                .with_table(Table::new("a")),
        )
        .unwrap();
        for database in Database::ALL {
            let ddl = generate_ddl(&document, database);
            let a = ddl.find("CREATE TABLE a").unwrap();
            let b = ddl.find("CREATE TABLE b").unwrap();
            assert!(a < b, "{database}");
            assert_eq!(ddl, generate_ddl(&document, database));
        }
    }

    #[test]
    fn test_parallel_relationships_get_distinct_fk_names() {
        let mut store = Store::with_document(
            Document::from_data(
                DocumentData::new()
                    .with_table(
                        Table::new("A")
                            .with_id("A")
                            .add_column(Column::new("id", "int").with_id("A.id").primary_key()),
                    )
                    .with_table(Table::new("B").with_id("B")),
            )
            .unwrap(),
            &Config::default(),
        );
        for _ in 0..2 {
            let commands =
                relationship::add_relationship(store.document(), RelationshipType::OneN, "A", "B");
            store.dispatch(commands).unwrap();
        }

        for database in Database::ALL {
            let ddl = generate_ddl(store.document(), database);
            assert!(ddl.contains("FK_A_TO_B1"), "{database}: {ddl}");
            assert_eq!(ddl.matches("FK_A_TO_B").count(), 2, "{database}: {ddl}");
        }
        let columns: Vec<&str> = store
            .document()
            .table("B")
            .unwrap()
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(columns, ["id", "id1"]);
    }

    #[test]
    fn test_auto_increment_suppresses_default() {
        let document = Document::from_data(
            DocumentData::new().with_table(
                Table::new("seq").add_column(
                    Column::new("id", "int")
                        .primary_key()
                        .auto_increment()
                        .with_default("42"),
                ),
            ),
        )
        .unwrap();
        for database in Database::ALL {
            let ddl = generate_ddl(&document, database);
            assert!(!ddl.contains("DEFAULT 42"), "{database}: {ddl}");
            if database != Database::SQLite {
                assert!(
                    ["AUTO_INCREMENT", "IDENTITY"].iter().any(|clause| ddl.contains(clause)),
                    "{database}: {ddl}"
                );
            } else {
                assert!(ddl.contains("AUTOINCREMENT"));
            }
        }
    }

    #[test]
    fn test_dangling_column_is_skipped_by_generation() {
        let json = r#"{
            "canvas": {"width": 2000, "height": 2000, "scroll_top": 0, "scroll_left": 0},
            "tables": [
                {"id": "a", "name": "a", "comment": "", "columns": [],
                 "ui": {"top": 0, "left": 0, "width_name": 60, "width_comment": 60, "z_index": 1, "active": false}},
                {"id": "b", "name": "b", "comment": "", "columns": [],
                 "ui": {"top": 0, "left": 300, "width_name": 60, "width_comment": 60, "z_index": 2, "active": false}}
            ],
            "relationships": [
                {"id": "r", "relationship_type": "OneN",
                 "start": {"table_id": "a", "column_ids": ["gone"]},
                 "end": {"table_id": "b", "column_ids": ["gone"]}},
                {"id": "orphan", "relationship_type": "OneN",
                 "start": {"table_id": "a", "column_ids": []},
                 "end": {"table_id": "missing", "column_ids": []}}
            ],
            "memos": []
        }"#;
        let document = Document::from_json(json).unwrap();
        assert_eq!(document.relationship_count(), 1);
        assert!(!generate_ddl(&document, Database::PostgreSQL).contains("FOREIGN KEY"));
    }
}
