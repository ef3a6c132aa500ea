#![allow(dead_code)]

use dimgrid::api::{ApiReply, DimensionApi, DimensionPage, ExportLink, ListQuery};
use dimgrid::dimension::{Dimension, DimensionKind};
use dimgrid::error::RemoteError;
use dimgrid::grid::TablePayload;
use dimgrid::time_dimension::TimeDimensionConfig;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory stand-in for the dimension endpoints. Records every call.
pub struct MockApi {
    pub dimensions: Vec<Dimension>,
    pub gl_account: Vec<Dimension>,
    pub calls: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockApi {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        MockApi {
            dimensions,
            gl_account: vec![Dimension::system("gl", "GL Account", DimensionKind::GlAccount)],
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn numbered_dimensions(count: usize) -> Vec<Dimension> {
    (1..=count)
        .map(|i| Dimension::new(&format!("d{}", i), &format!("Dimension {}", i), DimensionKind::Standard))
        .collect()
}

impl DimensionApi for MockApi {
    async fn list_dimensions(&self, query: &ListQuery) -> Result<DimensionPage, RemoteError> {
        self.record(format!("list:{}", query.page))?;
        let matching: Vec<Dimension> = self
            .dimensions
            .iter()
            .filter(|d| match &query.search {
                Some(term) => d.name.to_lowercase().contains(&term.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();
        let start = (query.page - 1) * query.limit;
        let items = matching.iter().skip(start).take(query.limit).cloned().collect();
        Ok(DimensionPage {
            items,
            total: matching.len(),
            gl_account: self.gl_account.clone(),
        })
    }

    async fn delete_dimension(&self, id: &str) -> Result<ApiReply<Value>, RemoteError> {
        self.record(format!("delete:{}", id))?;
        Ok(ApiReply::message("Dimension deleted"))
    }

    async fn rename_dimension(&self, id: &str, name: &str) -> Result<ApiReply<Value>, RemoteError> {
        self.record(format!("rename:{}:{}", id, name))?;
        Ok(ApiReply::message("Dimension renamed"))
    }

    async fn reload_dimension(&self, id: &str) -> Result<ApiReply<Dimension>, RemoteError> {
        self.record(format!("reload:{}", id))?;
        let mut dimension = self
            .dimensions
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .unwrap_or_else(|| Dimension::new(id, "Reloaded", DimensionKind::Standard));
        dimension.member_count = Some(42);
        Ok(ApiReply {
            data: Some(dimension),
            message: Some("Dimension reloaded".to_string()),
        })
    }

    async fn export_dimension(&self, id: &str) -> Result<ExportLink, RemoteError> {
        self.record(format!("export:{}", id))?;
        Ok(ExportLink {
            url: format!("https://files.example.com/{}.xlsx", id),
            message: None,
        })
    }

    async fn export_gl_account(&self) -> Result<ExportLink, RemoteError> {
        self.record("export_gl".to_string())?;
        Ok(ExportLink {
            url: "https://files.example.com/gl_account.xlsx".to_string(),
            message: None,
        })
    }

    async fn save_configuration(&self, id: &str, payload: &TablePayload) -> Result<ApiReply<Value>, RemoteError> {
        self.record(format!("save_configuration:{}:{}", id, payload.rows.len()))?;
        Ok(ApiReply::empty())
    }

    async fn save_time_dimension(
        &self,
        id: Option<&str>,
        config: &TimeDimensionConfig,
    ) -> Result<ApiReply<Value>, RemoteError> {
        match id {
            Some(id) => self.record(format!("update_time:{}:{}", id, config.name))?,
            None => self.record(format!("create_time:{}", config.name))?,
        }
        Ok(ApiReply::message("Time dimension saved"))
    }
}
