//! Modal Forms
//!
//! Draft state for create/edit modals and the changed-fields-only update body.

use serde_json::{Map, Number, Value};

use crate::models::{Customer, DealStatus, Opportunity, PipelineStage, Product, Role, User};

pub type Fields = Map<String, Value>;

/// Text-input state of a form bound to one record type
pub trait Draft: Clone + Default + PartialEq + Send + Sync + 'static {
    type Record;

    fn from_record(record: &Self::Record) -> Self;

    /// Request body, or the message the form should show
    fn payload(&self) -> Result<Fields, String>;

    /// Fields an edit may send
    fn editable() -> &'static [&'static str];
}

/// Fields of `draft` in `allowed` whose value differs from `original`
pub fn changed_fields(original: &Fields, draft: &Fields, allowed: &[&str]) -> Fields {
    allowed
        .iter()
        .filter_map(|key| {
            let value = draft.get(*key)?;
            (original.get(*key) != Some(value)).then(|| (key.to_string(), value.clone()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(Fields),
    Update { id: u32, fields: Fields },
    /// Edit with nothing changed; close without a request.
    Nothing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormModal<D: Draft> {
    pub open: bool,
    pub editing: Option<u32>,
    original: Option<D>,
    pub draft: D,
    pub submitting: bool,
}

impl<D: Draft> FormModal<D> {
    pub fn open_create(&mut self) {
        self.open = true;
        self.editing = None;
        self.original = None;
        self.draft = D::default();
        self.submitting = false;
    }

    pub fn open_edit(&mut self, id: u32, record: &D::Record) {
        let draft = D::from_record(record);
        self.open = true;
        self.editing = Some(id);
        self.original = Some(draft.clone());
        self.draft = draft;
        self.submitting = false;
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Build the request for the current draft and mark the form busy.
    pub fn submission(&mut self) -> Result<Submission, String> {
        let payload = self.draft.payload()?;
        let submission = match (self.editing, &self.original) {
            (Some(id), Some(original)) => {
                let before = original.payload().unwrap_or_default();
                let fields = changed_fields(&before, &payload, D::editable());
                if fields.is_empty() {
                    Submission::Nothing
                } else {
                    Submission::Update { id, fields }
                }
            }
            _ => Submission::Create(payload),
        };
        if submission == Submission::Nothing {
            self.close();
        } else {
            self.submitting = true;
        }
        Ok(submission)
    }

    /// Close on success; otherwise keep the draft for another attempt.
    pub fn finish(&mut self, succeeded: bool) {
        if succeeded {
            self.close();
        } else {
            self.submitting = false;
        }
    }
}

// ========================
// Field helpers
// ========================

fn required(value: &str, label: &str) -> Result<Value, String> {
    let value = value.trim();
    if value.is_empty() {
        Err(format!("{} is required", label))
    } else {
        Ok(Value::String(value.to_string()))
    }
}

/// Blank optional text is sent as `null`.
fn optional(value: &str) -> Value {
    match value.trim() {
        "" => Value::Null,
        v => Value::String(v.to_string()),
    }
}

fn id_field(value: &str, label: &str) -> Result<Value, String> {
    value
        .trim()
        .parse::<u32>()
        .map(Value::from)
        .map_err(|_| format!("{} is required", label))
}

fn amount(value: &str, label: &str) -> Result<Value, String> {
    let cleaned: String = value.chars().filter(|c| !matches!(c, ' ' | ',' | '_')).collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("{} must be a non-negative number", label))
}

fn price_text(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ========================
// Drafts
// ========================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Draft for CustomerDraft {
    type Record = Customer;

    fn from_record(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone().unwrap_or_default(),
            phone: c.phone.clone().unwrap_or_default(),
        }
    }

    fn payload(&self) -> Result<Fields, String> {
        let mut fields = Fields::new();
        fields.insert("name".into(), required(&self.name, "Name")?);
        fields.insert("email".into(), optional(&self.email));
        fields.insert("phone".into(), optional(&self.phone));
        Ok(fields)
    }

    fn editable() -> &'static [&'static str] {
        &["name", "email", "phone"]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityDraft {
    pub title: String,
    pub customer: String,
    pub value: String,
    /// `YYYY-MM-DD` from a date input
    pub expected_close_date: String,
    pub stage: String,
}

impl Draft for OpportunityDraft {
    type Record = Opportunity;

    fn from_record(o: &Opportunity) -> Self {
        Self {
            title: o.title.clone(),
            customer: o.customer.to_string(),
            value: price_text(o.value),
            expected_close_date: o
                .expected_close_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            stage: o.stage.to_string(),
        }
    }

    fn payload(&self) -> Result<Fields, String> {
        let mut fields = Fields::new();
        fields.insert("title".into(), required(&self.title, "Title")?);
        fields.insert("customer".into(), id_field(&self.customer, "Customer")?);
        fields.insert("value".into(), amount(&self.value, "Value")?);
        fields.insert(
            "expected_close_date".into(),
            required(&self.expected_close_date, "Expected close date")?,
        );
        fields.insert("stage".into(), id_field(&self.stage, "Stage")?);
        Ok(fields)
    }

    /// Value follows the line items once the deal exists.
    fn editable() -> &'static [&'static str] {
        &["title", "customer", "expected_close_date", "stage"]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub code: String,
    pub price: String,
    pub description: String,
}

impl Draft for ProductDraft {
    type Record = Product;

    fn from_record(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            code: p.code.clone().unwrap_or_default(),
            price: price_text(p.price),
            description: p.description.clone().unwrap_or_default(),
        }
    }

    fn payload(&self) -> Result<Fields, String> {
        let mut fields = Fields::new();
        fields.insert("name".into(), required(&self.name, "Name")?);
        fields.insert("code".into(), optional(&self.code));
        fields.insert("price".into(), amount(&self.price, "Price")?);
        fields.insert("description".into(), optional(&self.description));
        Ok(fields)
    }

    fn editable() -> &'static [&'static str] {
        &["name", "code", "price", "description"]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            role: Role::Rep,
            password: String::new(),
        }
    }
}

impl Draft for UserDraft {
    type Record = User;

    fn from_record(u: &User) -> Self {
        Self {
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role,
            password: String::new(),
        }
    }

    /// Password is only collected when creating.
    fn payload(&self) -> Result<Fields, String> {
        let mut fields = Fields::new();
        fields.insert("username".into(), required(&self.username, "Username")?);
        fields.insert("email".into(), Value::String(self.email.trim().to_string()));
        fields.insert("role".into(), Value::String(self.role.as_str().to_string()));
        if !self.password.is_empty() {
            fields.insert("password".into(), Value::String(self.password.clone()));
        }
        Ok(fields)
    }

    fn editable() -> &'static [&'static str] {
        &["email", "role"]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageDraft {
    pub name: String,
    pub order: String,
    pub kind: DealStatus,
}

impl Draft for StageDraft {
    type Record = PipelineStage;

    fn from_record(s: &PipelineStage) -> Self {
        Self {
            name: s.name.clone(),
            order: s.order.to_string(),
            kind: s.kind,
        }
    }

    fn payload(&self) -> Result<Fields, String> {
        let order = match self.order.trim() {
            "" => 0,
            v => v.parse::<i32>().map_err(|_| "Order must be a whole number".to_string())?,
        };
        let mut fields = Fields::new();
        fields.insert("name".into(), required(&self.name, "Stage name")?);
        fields.insert("order".into(), Value::from(order));
        fields.insert("type".into(), Value::String(self.kind.as_str().to_string()));
        Ok(fields)
    }

    fn editable() -> &'static [&'static str] {
        &["name", "order", "type"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opportunity() -> Opportunity {
        serde_json::from_value(json!({
            "id": 11, "title": "ERP", "value": "5000000.00", "expected_close_date": "2025-06-30",
            "status": "OPEN", "stage": 2, "customer": 4
        }))
        .unwrap()
    }

    #[test]
    fn test_changed_fields_respects_allow_list() {
        let original = json!({"a": 1, "b": 2, "c": 3}).as_object().cloned().unwrap();
        let draft = json!({"a": 1, "b": 5, "c": 9}).as_object().cloned().unwrap();
        let changed = changed_fields(&original, &draft, &["a", "b"]);
        assert_eq!(Value::Object(changed), json!({"b": 5}));
    }

    #[test]
    fn test_edit_sends_only_changed_editable_fields() {
        let mut modal = FormModal::<OpportunityDraft>::default();
        modal.open_edit(11, &opportunity());
        assert_eq!(modal.draft.expected_close_date, "2025-06-30");
        assert_eq!(modal.draft.value, "5000000");

        modal.draft.title = "ERP phase 2".into();
        modal.draft.value = "9000000".into();

        let submission = modal.submission().unwrap();
        let expected = json!({"title": "ERP phase 2"}).as_object().cloned().unwrap();
        assert_eq!(submission, Submission::Update { id: 11, fields: expected });
        assert!(modal.submitting);
    }

    #[test]
    fn test_modal_closes_only_on_success() {
        let mut modal = FormModal::<CustomerDraft>::default();
        modal.open_create();
        modal.draft.name = "ACME".into();
        assert!(matches!(modal.submission(), Ok(Submission::Create(_))));

        modal.finish(false);
        assert!(modal.open);
        assert!(!modal.submitting);
        assert_eq!(modal.draft.name, "ACME");

        modal.finish(true);
        assert!(!modal.open);
        assert_eq!(modal.draft, CustomerDraft::default());
    }

    #[test]
    fn test_unchanged_edit_closes_without_request() {
        let customer = Customer {
            id: 1,
            name: "ACME".into(),
            email: None,
            phone: Some("0901".into()),
            created_at: None,
        };
        let mut modal = FormModal::<CustomerDraft>::default();
        modal.open_edit(1, &customer);
        assert_eq!(modal.submission(), Ok(Submission::Nothing));
        assert!(!modal.open);
    }

    #[test]
    fn test_validation_keeps_modal_idle() {
        let mut modal = FormModal::<OpportunityDraft>::default();
        modal.open_create();
        modal.draft.title = "Deal".into();
        assert_eq!(modal.submission(), Err("Customer is required".to_string()));
        assert!(!modal.submitting);
    }

    #[test]
    fn test_user_create_and_edit_payloads() {
        let mut modal = FormModal::<UserDraft>::default();
        modal.open_create();
        modal.draft.username = "bob".into();
        modal.draft.password = "secret1".into();
        match modal.submission().unwrap() {
            Submission::Create(fields) => {
                assert_eq!(fields.get("password"), Some(&json!("secret1")));
                assert_eq!(fields.get("role"), Some(&json!("REP")));
            }
            other => panic!("unexpected {:?}", other),
        }

        let user = User { id: 3, username: "bob".into(), email: "b@x.io".into(), role: Role::Rep };
        modal.open_edit(3, &user);
        modal.draft.username = "robert".into();
        modal.draft.role = Role::Manager;
        let expected = json!({"role": "MANAGER"}).as_object().cloned().unwrap();
        assert_eq!(modal.submission(), Ok(Submission::Update { id: 3, fields: expected }));
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(amount("1,500,000", "Value"), Ok(json!(1500000.0)));
        assert!(amount("-3", "Value").is_err());
        assert!(amount("abc", "Value").is_err());
    }
}
