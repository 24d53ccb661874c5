//! REST Resources
//!
//! Typed collection endpoints with the router's `{path}{id}/` item URLs.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiClient, ApiError};
use crate::listing::Page;
use crate::models::{
    Activity, Customer, Opportunity, OpportunityItem, PipelineStage, Product, Task, User,
};

pub struct Resource<T> {
    path: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Resource<T> {}

impl<T: DeserializeOwned> Resource<T> {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn item_path(&self, id: u32) -> String {
        format!("{}{}/", self.path, id)
    }

    pub async fn list(&self, client: &ApiClient, query: &[(&str, String)]) -> Result<Page<T>, ApiError> {
        client.get(self.path, query).await
    }

    /// Every record the backend returns for `query`, ignoring pagination
    pub async fn all(&self, client: &ApiClient, query: &[(&str, String)]) -> Result<Vec<T>, ApiError> {
        Ok(self.list(client, query).await?.into_items())
    }

    pub async fn get(&self, client: &ApiClient, id: u32) -> Result<T, ApiError> {
        client.get(&self.item_path(id), &[]).await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, client: &ApiClient, body: &B) -> Result<(), ApiError> {
        client.post(self.path, body).await?;
        Ok(())
    }

    /// Partial update
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        client: &ApiClient,
        id: u32,
        body: &B,
    ) -> Result<(), ApiError> {
        client.patch(&self.item_path(id), body).await?;
        Ok(())
    }

    pub async fn delete(&self, client: &ApiClient, id: u32) -> Result<(), ApiError> {
        client.delete(&self.item_path(id)).await
    }
}

pub const CUSTOMERS: Resource<Customer> = Resource::new("customers/");
pub const STAGES: Resource<PipelineStage> = Resource::new("stages/");
pub const OPPORTUNITIES: Resource<Opportunity> = Resource::new("opportunities/");
pub const PRODUCTS: Resource<Product> = Resource::new("products/");
pub const OPPORTUNITY_ITEMS: Resource<OpportunityItem> = Resource::new("opportunity-items/");
pub const ACTIVITIES: Resource<Activity> = Resource::new("activities/");
pub const TASKS: Resource<Task> = Resource::new("tasks/");
pub const USERS: Resource<User> = Resource::new("auth/users/");

#[cfg(test)]
mod tests {
    use super::super::mock::{empty_response, json_response, MockTransport};
    use super::super::Method;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_crud_paths() {
        let mock = MockTransport::new(|req| match req.method {
            Method::Get => json_response(200, json!({"id": 5, "name": "ACME"})),
            Method::Delete => empty_response(204),
            _ => json_response(200, json!({})),
        });
        let client = mock.default_client();

        let customer = CUSTOMERS.get(&client, 5).await.unwrap();
        assert_eq!(customer.name, "ACME");
        CUSTOMERS.update(&client, 5, &json!({"phone": "0901"})).await.unwrap();
        CUSTOMERS.delete(&client, 5).await.unwrap();
        USERS.create(&client, &json!({"username": "bob"})).await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                (Method::Get, "customers/5/".to_string()),
                (Method::Patch, "customers/5/".to_string()),
                (Method::Delete, "customers/5/".to_string()),
                (Method::Post, "auth/users/".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_all_accepts_both_list_shapes() {
        let mock = MockTransport::new(|req| {
            if req.url.contains("stages") {
                json_response(200, json!([{"id": 1, "name": "Lead", "order": 1, "type": "OPEN"}]))
            } else {
                json_response(200, json!({
                    "count": 1, "next": null, "previous": null,
                    "results": [{"id": 2, "name": "Seat", "price": "10.00"}]
                }))
            }
        });
        let client = mock.default_client();

        assert_eq!(STAGES.all(&client, &[]).await.unwrap().len(), 1);
        let products = PRODUCTS.all(&client, &[]).await.unwrap();
        assert_eq!(products[0].price, 10.0);
    }

    #[tokio::test]
    async fn test_delete_then_refetch_drops_row() {
        use std::sync::{Arc, Mutex};

        let rows = Arc::new(Mutex::new(vec![
            json!({"id": 1, "name": "ACME"}),
            json!({"id": 2, "name": "Globex"}),
        ]));
        let server_rows = rows.clone();
        let mock = MockTransport::new(move |req| {
            let mut rows = server_rows.lock().unwrap();
            match req.method {
                Method::Delete => {
                    rows.retain(|r| !req.url.ends_with(&format!("customers/{}/", r["id"])));
                    empty_response(204)
                }
                _ => json_response(200, json!({"count": rows.len(), "results": rows.clone()})),
            }
        });
        let client = mock.default_client();

        let before = CUSTOMERS.list(&client, &[]).await.unwrap();
        assert_eq!(before.total(), 2);

        CUSTOMERS.delete(&client, 2).await.unwrap();
        let after = CUSTOMERS.list(&client, &[]).await.unwrap();
        let names: Vec<&str> = after.items().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ACME"]);
    }
}
