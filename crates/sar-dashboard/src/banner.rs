use sar_core::EpochMillis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient message shown after a handler finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub expires_at: EpochMillis,
}

impl Banner {
    pub fn new(
        kind: BannerKind,
        message: impl Into<String>,
        now: EpochMillis,
        ttl_ms: u64,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }

    pub fn is_visible(&self, now: EpochMillis) -> bool {
        now < self.expires_at
    }
}
