use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Keyset boundary of a page: the `(created_at, id)` of its last row under
/// `created_at DESC, id DESC` ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

pub enum CursorLookup {
    /// Page 1 needs no cursor.
    FirstPage,
    Cursor(PageCursor),
    /// The caller skipped ahead of the furthest page it has visited.
    Unknown,
}

/// Per-session store of page-boundary cursors, extended lazily as the caller
/// pages forward. Revisiting a page reuses the stored cursor, so results are
/// stable while the underlying data is stable but best-effort once rows were
/// inserted or deleted in between visits.
#[derive(Debug, Clone, Default)]
pub struct PageTokens {
    boundaries: Vec<PageCursor>,
}

impl PageTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor_for_page(&self, page: u32) -> CursorLookup {
        if page <= 1 {
            return CursorLookup::FirstPage;
        }
        match self.boundaries.get(page as usize - 2) {
            Some(cursor) => CursorLookup::Cursor(*cursor),
            None => CursorLookup::Unknown,
        }
    }

    /// Records the boundary of `page`. Overwrites a boundary seen before,
    /// ignores pages further ahead than one past the known frontier.
    pub fn record_boundary(&mut self, page: u32, cursor: PageCursor) {
        if page == 0 {
            return;
        }
        let index = page as usize - 1;
        if index < self.boundaries.len() {
            self.boundaries[index] = cursor;
        } else if index == self.boundaries.len() {
            self.boundaries.push(cursor);
        }
    }

    pub fn known_pages(&self) -> u32 {
        self.boundaries.len() as u32
    }
}

/// Server-side token storage, one [`PageTokens`] per admin session and
/// listing scope (collection + status filter).
#[derive(Debug, Default)]
pub struct PageTokenStore {
    sessions: std::collections::HashMap<(Uuid, String), PageTokens>,
}

impl PageTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens_mut(&mut self, session: Uuid, scope: &str) -> &mut PageTokens {
        self.sessions
            .entry((session, scope.to_string()))
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(secs: i64) -> PageCursor {
        PageCursor {
            created_at: DateTime::from_timestamp(secs, 0).unwrap(),
            id: Uuid::new_v4(),
        }
    }

    #[test]
    fn first_page_needs_no_cursor() {
        let tokens = PageTokens::new();
        assert!(matches!(tokens.cursor_for_page(1), CursorLookup::FirstPage));
    }

    #[test]
    fn page_beyond_frontier_is_unknown() {
        let mut tokens = PageTokens::new();
        tokens.record_boundary(1, cursor(100));
        assert!(matches!(tokens.cursor_for_page(3), CursorLookup::Unknown));
    }

    #[test]
    fn revisited_page_reuses_recorded_cursor() {
        let mut tokens = PageTokens::new();
        let first_boundary = cursor(100);
        tokens.record_boundary(1, first_boundary);
        tokens.record_boundary(2, cursor(50));

        match tokens.cursor_for_page(2) {
            CursorLookup::Cursor(found) => assert_eq!(found, first_boundary),
            _ => panic!("expected recorded cursor for page 2"),
        }
    }

    #[test]
    fn recording_far_ahead_is_ignored() {
        let mut tokens = PageTokens::new();
        tokens.record_boundary(5, cursor(10));
        assert_eq!(tokens.known_pages(), 0);
    }
}
