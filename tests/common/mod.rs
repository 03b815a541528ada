//! 集成测试共用工具
//!
//! - `ScriptedClient`：按脚本返回结论或失败的分析客户端，记录每次调用
//! - `candidates`：生成不落盘的候选文件

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use phishing_guard::{AnalysisClient, ApiError, BatchSession, Candidate, EmailItem, Verdict};

/// 分析请求发出时观察到的会话状态
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub running: bool,
    pub last_error: Option<String>,
    pub progress: Option<(usize, usize)>,
}

#[derive(Clone, Default)]
pub struct ScriptedClient {
    calls: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    removals: Arc<Mutex<HashMap<String, usize>>>,
    observations: Arc<Mutex<Vec<Observation>>>,
    session: Option<BatchSession>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求时可以读取或修改该会话（模拟用户在分析途中的操作）
    pub fn observing(mut self, session: &BatchSession) -> Self {
        self.session = Some(session.clone());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fail_on(&self, name: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(name.to_string(), message.to_string());
    }

    pub fn succeed_on(&self, name: &str) {
        self.failures.lock().unwrap().remove(name);
    }

    /// 分析 `name` 时，从会话中删除第 `index` 封
    pub fn remove_while_analyzing(&self, name: &str, index: usize) {
        self.removals
            .lock()
            .unwrap()
            .insert(name.to_string(), index);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn observations(&self) -> Vec<Observation> {
        self.observations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisClient for ScriptedClient {
    async fn analyze(&self, item: &EmailItem) -> Result<Verdict, ApiError> {
        self.calls.lock().unwrap().push(item.name.clone());

        if let Some(session) = &self.session {
            let snapshot = session.snapshot().await;
            let running = session.is_running().await;
            self.observations.lock().unwrap().push(Observation {
                name: item.name.clone(),
                running,
                last_error: snapshot.last_error.clone(),
                progress: snapshot.progress(),
            });

            let removal = self.removals.lock().unwrap().remove(&item.name);
            if let Some(index) = removal {
                session.remove(index).await.unwrap();
            }
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.lock().unwrap().get(&item.name).cloned();
        match failure {
            Some(message) => Err(ApiError::BadResponse {
                endpoint: "scripted".to_string(),
                status: 500,
                message,
            }),
            None => Ok(verdict_for(&item.name)),
        }
    }
}

/// 结论的主题即文件名，便于校验结论是否写在了正确的位置
pub fn verdict_for(name: &str) -> Verdict {
    let is_suspicious = name.contains("phish");
    Verdict {
        is_suspicious,
        sender: "sender@example.com".to_string(),
        subject: name.to_string(),
        recipient: "me@example.com".to_string(),
        date: "Thu, 20 Mar 2025 09:00:00 +0000".to_string(),
        findings: vec![if is_suspicious {
            "Suspicious link detected".to_string()
        } else {
            "No indicators found".to_string()
        }],
    }
}

pub fn candidates(names: &[&str]) -> Vec<Candidate> {
    names
        .iter()
        .map(|name| Candidate::new(format!("/fixtures/{}", name), *name, 128))
        .collect()
}
