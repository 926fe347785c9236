//! Lobby aggregate: presence set and global mode.
//!
//! Both live in one struct so that every join/leave mutates the session map and
//! the live-user counter in the same step. Callers hold a single lock around the
//! whole `Lobby`.

use indexmap::IndexMap;

use super::{
    admission::{Admission, DenyReason, admit},
    entity::{Claim, Session, SessionProfile},
    value_object::{ConnectionId, UserId},
};

/// Public status / subscribe responses report "busy" when more than this many
/// users are live. Looser than the admission limit.
pub const PUBLIC_BUSY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicStatus {
    /// Inactive or crowded: the fixed "big announcement" text.
    Announcement,
    /// Otherwise: the fixed "high volume of inquiries" text.
    HighVolume,
}

/// Process-wide `active` flag and live-user counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMode {
    state: ModeState,
    live_user_count: usize,
}

impl Default for GlobalMode {
    fn default() -> Self {
        Self {
            state: ModeState::Active,
            live_user_count: 0,
        }
    }
}

impl GlobalMode {
    pub fn state(&self) -> ModeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == ModeState::Active
    }

    pub fn live_user_count(&self) -> usize {
        self.live_user_count
    }

    /// Flips Active ⇄ Inactive. Each call flips.
    pub fn toggle(&mut self) -> ModeState {
        self.state = match self.state {
            ModeState::Active => ModeState::Inactive,
            ModeState::Inactive => ModeState::Active,
        };
        self.state
    }

    /// One-way transition to Inactive.
    pub fn force_inactive(&mut self) -> ModeState {
        self.state = ModeState::Inactive;
        self.state
    }

    pub fn is_publicly_busy(&self) -> bool {
        !self.is_active() || self.live_user_count > PUBLIC_BUSY_THRESHOLD
    }

    pub fn public_status(&self) -> PublicStatus {
        if self.is_publicly_busy() {
            PublicStatus::Announcement
        } else {
            PublicStatus::HighVolume
        }
    }

    fn increment(&mut self) {
        self.live_user_count += 1;
    }

    fn decrement(&mut self) {
        self.live_user_count = self.live_user_count.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lobby {
    mode: GlobalMode,
    /// Insertion order = join order.
    sessions: IndexMap<ConnectionId, Session>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &GlobalMode {
        &self.mode
    }

    /// Runs the admission gate against the current counters and, on Allow,
    /// joins the session.
    pub fn admit_and_join(&mut self, claim: Option<&Claim>, session: Session) -> Admission {
        if self.sessions.contains_key(&session.connection_id) {
            return Admission::Deny(DenyReason::DuplicateConnection);
        }
        let admission = admit(claim, self.mode.live_user_count, self.mode.is_active());
        if admission.is_allowed() {
            self.insert(session);
        }
        admission
    }

    /// Appends the session without the admission gate. Returns false (and
    /// changes nothing) when the connection id is already present.
    #[cfg(test)]
    pub fn join(&mut self, session: Session) -> bool {
        if self.sessions.contains_key(&session.connection_id) {
            return false;
        }
        self.insert(session);
        true
    }

    fn insert(&mut self, session: Session) {
        self.sessions.insert(session.connection_id.clone(), session);
        self.mode.increment();
    }

    /// Removes the session for `connection_id`. Unknown ids leave the counter
    /// untouched.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<Session> {
        let session = self.sessions.shift_remove(connection_id)?;
        self.mode.decrement();
        Some(session)
    }

    pub fn find(&self, connection_id: &ConnectionId) -> Option<&Session> {
        self.sessions.get(connection_id)
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.sessions.keys().cloned().collect()
    }

    /// Applies the profile from a `join` event. A missing user id falls back to
    /// the connection id.
    pub fn update_profile(
        &mut self,
        connection_id: &ConnectionId,
        profile: SessionProfile,
    ) -> Option<Session> {
        let session = self.sessions.get_mut(connection_id)?;
        session.user_id = profile
            .user_id
            .unwrap_or_else(|| UserId::from(connection_id));
        session.display_name = profile.display_name;
        session.verified = profile.verified;
        Some(session.clone())
    }

    pub fn toggle(&mut self) -> ModeState {
        self.mode.toggle()
    }

    pub fn emergency_exit(&mut self) -> ModeState {
        self.mode.force_inactive()
    }
}
