//! Fine-grained change notification
//!
//! Executors record every real change into a [`ChangeLog`] while a batch runs.
//! Once the batch is applied, the store drains the log into [`Observers`],
//! which invokes each subscription whose target (and optional field) matches.

use indexmap::IndexSet;

use super::canvas::ShowKey;
use super::helper::Id;

/// Observable part of the document
#[derive(Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Target {
    #[display("canvas")]
    Canvas,
    #[display("editor")]
    Editor,
    #[display("tables")]
    Tables,
    #[display("relationships")]
    Relationships,
    #[display("memos")]
    Memos,
    #[display("table:{_0}")]
    Table(Id),
    /// Column list of a table
    #[display("columns:{_0}")]
    Columns(Id),
    /// Column ids are unique per table only, so the table id is part of the key
    #[display("column:{_0}.{_1}")]
    Column(Id, Id),
    #[display("relationship:{_0}")]
    Relationship(Id),
    #[display("memo:{_0}")]
    Memo(Id),
}

/// Scalar field of an observable target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Field {
    Name,
    Comment,
    DataType,
    Default,
    AutoIncrement,
    PrimaryKey,
    Unique,
    NotNull,
    /// Derived key markers (pk, fk, pfk)
    Key,
    Top,
    Left,
    WidthName,
    WidthComment,
    WidthDataType,
    WidthDefault,
    Width,
    Height,
    ZIndex,
    Active,
    Value,
    RelationshipType,
    Identification,
    Start,
    End,
    ScrollTop,
    ScrollLeft,
    #[display("Show({_0})")]
    Show(ShowKey),
    Database,
    DatabaseName,
    CanvasType,
    Language,
    TableCase,
    ColumnCase,
    ColumnOrder,
    RelationshipDataTypeSync,
    Focus,
    EditTable,
    FocusTable,
    DrawRelationship,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Change {
    Field(Field),
    Inserted(Id),
    Removed(Id),
    Moved(Id),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Notification {
    pub target: Target,
    pub change: Change,
}

/// Changes recorded during one batch, deduplicated, in first-touch order
#[derive(Debug, Default)]
pub(crate) struct ChangeLog {
    entries: IndexSet<Notification>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: Target, change: Change) {
        self.entries.insert(Notification { target, change });
    }

    /// Write `value` into `slot`, recording the field only when it changes.
    /// Returns the previous value.
    pub fn assign<T: PartialEq>(
        &mut self,
        slot: &mut T,
        value: T,
        target: &Target,
        field: Field,
    ) -> T {
        if *slot == value {
            return value;
        }
        self.record(target.clone(), Change::Field(field));
        std::mem::replace(slot, value)
    }

    pub fn field(&mut self, target: &Target, field: Field) {
        self.record(target.clone(), Change::Field(field));
    }

    pub fn inserted(&mut self, target: Target, id: &str) {
        self.record(target, Change::Inserted(id.to_string()));
    }

    pub fn removed(&mut self, target: Target, id: &str) {
        self.record(target, Change::Removed(id.to_string()));
    }

    pub fn moved(&mut self, target: Target, id: &str) {
        self.record(target, Change::Moved(id.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drain(self) -> impl Iterator<Item = Notification> {
        self.entries.into_iter()
    }
}

/// Handle returned by a subscription, used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type Callback = Box<dyn FnMut(&Notification)>;

struct Subscription {
    handle: SubscriptionHandle,
    target: Target,
    field: Option<Field>,
    callback: Callback,
}

impl Subscription {
    fn matches(&self, notification: &Notification) -> bool {
        if self.target != notification.target {
            return false;
        }
        match (self.field, &notification.change) {
            (None, _) => true,
            (Some(field), Change::Field(changed)) => field == *changed,
            (Some(_), _) => false,
        }
    }
}

/// Registry of change subscriptions
#[derive(Default)]
pub struct Observers {
    subscriptions: Vec<Subscription>,
    next_handle: u64,
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        target: Target,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionHandle {
        self.subscribe(target, None, Box::new(callback))
    }

    pub fn observe_field(
        &mut self,
        target: Target,
        field: Field,
        callback: impl FnMut(&Notification) + 'static,
    ) -> SubscriptionHandle {
        self.subscribe(target, Some(field), Box::new(callback))
    }

    fn subscribe(
        &mut self,
        target: Target,
        field: Option<Field>,
        callback: Callback,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.subscriptions.push(Subscription {
            handle,
            target,
            field,
            callback,
        });
        handle
    }

    /// Remove a subscription, returning whether it existed
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions
            .retain(|subscription| subscription.handle != handle);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub(crate) fn notify(&mut self, changes: ChangeLog) {
        for notification in changes.drain() {
            tracing::trace!(
                target_name = %notification.target,
                change = ?notification.change,
                "notify"
            );
            for subscription in self
                .subscriptions
                .iter_mut()
                .filter(|subscription| subscription.matches(&notification))
            {
                (subscription.callback)(&notification);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_assign_records_only_real_changes() {
        let mut changes = ChangeLog::new();
        let mut name = String::from("users");
        let target = Target::Table("t".into());

        changes.assign(&mut name, "users".to_string(), &target, Field::Name);
        assert!(changes.is_empty());

        let old = changes.assign(&mut name, "members".to_string(), &target, Field::Name);
        assert_eq!(old, "users");
        assert_eq!(name, "members");
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_changes_are_deduplicated_in_first_touch_order() {
        let mut changes = ChangeLog::new();
        let a = Target::Table("a".into());
        let b = Target::Table("b".into());
        changes.field(&a, Field::Top);
        changes.field(&b, Field::Top);
        changes.field(&a, Field::Top);
        let drained: Vec<Notification> = changes.drain().collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].target, a);
        assert_eq!(drained[1].target, b);
    }

    #[test]
    fn test_field_subscription_filters() {
        let mut observers = Observers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        observers.observe_field(Target::Canvas, Field::ScrollTop, move |n| {
            sink.borrow_mut().push(n.change.clone())
        });

        let mut changes = ChangeLog::new();
        changes.field(&Target::Canvas, Field::ScrollLeft);
        changes.field(&Target::Canvas, Field::ScrollTop);
        changes.field(&Target::Editor, Field::ScrollTop);
        observers.notify(changes);

        assert_eq!(*seen.borrow(), vec![Change::Field(Field::ScrollTop)]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut observers = Observers::new();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let handle = observers.observe(Target::Tables, move |_| *sink.borrow_mut() += 1);

        assert!(observers.unsubscribe(handle));
        assert!(!observers.unsubscribe(handle));

        let mut changes = ChangeLog::new();
        changes.inserted(Target::Tables, "t");
        observers.notify(changes);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(
            Target::Column("t1".into(), "c1".into()).to_string(),
            "column:t1.c1"
        );
        assert_eq!(Field::Show(ShowKey::Relationship).to_string(), "Show(relationship)");
    }
}
