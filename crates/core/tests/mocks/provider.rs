use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use vibecheck_core::{Provider, ProviderError, VideoTarget};

#[derive(Clone)]
pub struct MockProvider<T> {
    pub name: String,
    pub value: Option<T>,
    pub fail_with: fn() -> ProviderError,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl<T> MockProvider<T> {
    pub fn new(name: &str, value: T) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value),
            fail_with: || ProviderError::Empty,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(name: &str, fail_with: fn() -> ProviderError) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            fail_with,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl<T> Provider<T> for MockProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, target: &VideoTarget) -> Result<T, ProviderError> {
        self.calls.lock().unwrap().push(target.id.to_string());
        match &self.value {
            Some(value) => Ok(value.clone()),
            None => Err((self.fail_with)()),
        }
    }
}
