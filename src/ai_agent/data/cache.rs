use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use chrono::{DateTime, Utc};

use crate::ai_agent::data::models::FinancialMetrics;

pub const DEFAULT_SESSION: &str = "default";
pub const MAX_SESSIONS: usize = 1024;

/// Reports are keyed by their trimmed text so the same report always hits
/// the same memo entry.
pub fn normalize_report(report: &str) -> &str {
  report.trim()
}

/// What one user session remembers between actions. Every field is
/// last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct Session {
  pub last_report: Option<String>,
  pub document_text: Option<String>,
  pub document_name: Option<String>,
  metrics_memo: Option<(String, FinancialMetrics)>,
  pub updated_at: Option<DateTime<Utc>>,
  touched: u64,
}

/// In-memory session slots keyed by a client-chosen id. Holds at most
/// `capacity` sessions; the least recently updated one is dropped first.
pub struct SessionStore {
  sessions: Mutex<HashMap<String, Session>>,
  capacity: usize,
  clock: AtomicU64,
}

impl SessionStore {
  pub fn new() -> Self {
    SessionStore::with_capacity(MAX_SESSIONS)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    SessionStore { sessions: Mutex::new(HashMap::new()), capacity: capacity.max(1), clock: AtomicU64::new(0) }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
    self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  fn update<F>(&self, session_id: &str, f: F) where F: FnOnce(&mut Session) {
    let mut sessions = self.lock();
    if !sessions.contains_key(session_id) && sessions.len() >= self.capacity {
      let oldest: Option<String> = sessions.iter()
        .min_by_key(|(_, session)| session.touched)
        .map(|(id, _)| id.clone());
      if let Some(oldest) = oldest {
        log::info!("Session store full, evicting session {}", oldest);
        sessions.remove(&oldest);
      }
    }
    let session: &mut Session = sessions.entry(session_id.to_string()).or_default();
    f(session);
    session.updated_at = Some(Utc::now());
    session.touched = self.clock.fetch_add(1, Ordering::Relaxed);
  }

  pub fn get(&self, session_id: &str) -> Option<Session> {
    self.lock().get(session_id).cloned()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  /// Replaces the session's report. Metrics memoised for a different report
  /// are dropped.
  pub fn set_last_report(&self, session_id: &str, report: &str) {
    let report: &str = normalize_report(report);
    self.update(session_id, |session| {
      session.last_report = Some(report.to_string());
      if session.metrics_memo.as_ref().map_or(false, |(memo_report, _)| memo_report != report) {
        session.metrics_memo = None;
      }
    });
  }

  pub fn last_report(&self, session_id: &str) -> Option<String> {
    self.lock().get(session_id).and_then(|session| session.last_report.clone())
  }

  pub fn set_document(&self, session_id: &str, name: &str, text: &str) {
    self.update(session_id, |session| {
      session.document_name = Some(name.to_string());
      session.document_text = Some(text.to_string());
    });
  }

  pub fn document_text(&self, session_id: &str) -> Option<String> {
    self.lock().get(session_id).and_then(|session| session.document_text.clone())
  }

  pub fn cached_metrics(&self, session_id: &str, report: &str) -> Option<FinancialMetrics> {
    let report: &str = normalize_report(report);
    let result = self.lock().get(session_id)
      .and_then(|session| session.metrics_memo.as_ref())
      .filter(|(memo_report, _)| memo_report == report)
      .map(|(_, metrics)| metrics.clone());
    if result.is_some() {
      log::info!("Returning metrics for session {} from cache.", session_id);
    }
    return result;
  }

  /// Only the most recent extraction is kept per session.
  pub fn set_metrics(&self, session_id: &str, report: &str, metrics: FinancialMetrics) {
    let report: &str = normalize_report(report);
    self.update(session_id, |session| {
      session.metrics_memo = Some((report.to_string(), metrics));
    });
  }
}

impl Default for SessionStore {
  fn default() -> Self {
    SessionStore::new()
  }
}
