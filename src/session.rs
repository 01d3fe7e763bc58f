use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use crate::history::{archive_day, History};
use crate::ledger::{DailyLedger, Remaining, Totals};
use crate::models::{HistoryEntry, MealType, NutritionData, UserProfile};
use crate::profile::Biometrics;
use crate::store::{Slot, StateStore};

/// Token returned by [`Session::begin_analysis`]; a commit is only
/// applied while its token is still the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisToken(u64);

/// The single active tracking session: profile, today's ledger and the
/// rolling history, with persistence injected as a [`StateStore`].
///
/// All mutation happens through discrete, non-overlapping calls; every
/// mutation persists its slot before returning and reports a failed save
/// synchronously. The in-memory change stays applied either way, matching
/// the eventually-durable contract: a crash loses at most the unsaved
/// mutation, never a slot's own invariants.
pub struct Session<S: StateStore> {
    store: S,
    profile: Option<UserProfile>,
    ledger: DailyLedger,
    history: History,
    credential: Option<String>,
    analysis_seq: u64,
    pending_analysis: Option<NutritionData>,
}

impl<S: StateStore> Session<S> {
    /// Load the last saved state from the store. Absent slots are the
    /// valid initial state; a slot that fails to parse is dropped with a
    /// warning rather than blocking startup, as the app has always done.
    pub fn load(store: S) -> Result<Self> {
        let profile = match store.load(Slot::Profile)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable profile slot");
                    None
                }
            },
            None => None,
        };
        let ledger = match store.load(Slot::Ledger)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "discarding unreadable ledger slot");
                    DailyLedger::new()
                }
            },
            None => DailyLedger::new(),
        };
        let history = match store.load(Slot::History)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(h) => h,
                Err(e) => {
                    warn!(error = %e, "discarding unreadable history slot");
                    History::new()
                }
            },
            None => History::new(),
        };
        let credential = store.load(Slot::Credential)?.filter(|c| !c.is_empty());

        Ok(Self {
            store,
            profile,
            ledger,
            history,
            credential,
            analysis_seq: 0,
            pending_analysis: None,
        })
    }

    /// True until a profile has been set; drives onboarding.
    pub fn needs_onboarding(&self) -> bool {
        self.profile.is_none()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn ledger(&self) -> &DailyLedger {
        &self.ledger
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    /// Target minus consumed against the current profile, or None before
    /// onboarding.
    pub fn remaining(&self) -> Option<Remaining> {
        self.profile
            .as_ref()
            .map(|p| self.ledger.remaining(&p.targets()))
    }

    /// Create or replace the profile from biometric input, recomputing
    /// every target.
    pub fn set_profile(&mut self, bio: Biometrics) -> Result<&UserProfile> {
        let profile = UserProfile::new(bio);
        let raw = serde_json::to_string(&profile).context("serializing profile")?;
        let profile = self.profile.insert(profile);
        self.store.save(Slot::Profile, &raw)?;
        debug!(
            calories = profile.target_calories,
            "profile saved with recomputed targets"
        );
        Ok(profile)
    }

    /// Store the analysis-service credential.
    pub fn set_credential(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.store.save(Slot::Credential, &key)?;
        self.credential = if key.is_empty() { None } else { Some(key) };
        Ok(())
    }

    /// Log a manually entered meal. Returns the assigned entry id.
    pub fn log_meal(
        &mut self,
        meal_type: MealType,
        food_name: impl Into<String>,
        calories: u32,
        protein: f64,
        carbs: u32,
        fat: u32,
    ) -> Result<String> {
        let id = self
            .ledger
            .add(meal_type, food_name, calories, protein, carbs, fat)
            .id
            .clone();
        self.save_ledger()?;
        Ok(id)
    }

    /// Log an analyzed dish, dividing across `portions` people and
    /// keeping only this user's share. Returns the assigned entry id.
    pub fn log_analyzed(
        &mut self,
        data: &NutritionData,
        meal_type: MealType,
        portions: u32,
    ) -> Result<String> {
        let id = self.ledger.add_divided(data, meal_type, portions).id.clone();
        self.save_ledger()?;
        Ok(id)
    }

    /// Delete a meal by id. Deletion is immediate and irreversible; any
    /// confirmation dialog belongs to the presentation layer. Returns
    /// false (a no-op, not an error) when the id is not present.
    pub fn delete_meal(&mut self, id: &str) -> Result<bool> {
        if !self.ledger.remove(id) {
            return Ok(false);
        }
        self.save_ledger()?;
        Ok(true)
    }

    /// End the day: archive totals and targets into history and clear the
    /// ledger, persisting both slots. Requires a profile.
    pub fn archive_day(&mut self) -> Result<HistoryEntry> {
        let Some(profile) = self.profile.as_ref() else {
            bail!("cannot archive a day before a profile is set");
        };
        let entry = archive_day(&mut self.ledger, profile, &mut self.history);
        let raw = serde_json::to_string(&self.history).context("serializing history")?;
        self.store.save(Slot::History, &raw)?;
        self.save_ledger()?;
        Ok(entry)
    }

    /// Start an analysis round. Invalidates any earlier in-flight round,
    /// so a late response from an abandoned call can never land.
    pub fn begin_analysis(&mut self) -> AnalysisToken {
        self.analysis_seq += 1;
        self.pending_analysis = None;
        AnalysisToken(self.analysis_seq)
    }

    /// Apply an analysis result as a single atomic commit. Returns false
    /// and discards the result if the session has moved on since the
    /// token was issued.
    pub fn commit_analysis(&mut self, token: AnalysisToken, data: NutritionData) -> bool {
        if token.0 != self.analysis_seq {
            warn!(food = %data.food_name, "discarding stale analysis result");
            return false;
        }
        self.pending_analysis = Some(data);
        true
    }

    /// The committed result awaiting user confirmation, if any.
    pub fn pending_analysis(&self) -> Option<&NutritionData> {
        self.pending_analysis.as_ref()
    }

    /// Abandon the current analysis round, e.g. when the user leaves the
    /// loading or results screen.
    pub fn discard_analysis(&mut self) {
        self.pending_analysis = None;
        self.analysis_seq += 1;
    }

    /// Confirm the pending analysis result into the ledger. Returns None
    /// when nothing is pending.
    pub fn log_pending(&mut self, meal_type: MealType, portions: u32) -> Result<Option<String>> {
        let Some(data) = self.pending_analysis.take() else {
            return Ok(None);
        };
        self.analysis_seq += 1;
        let id = self.log_analyzed(&data, meal_type, portions)?;
        Ok(Some(id))
    }

    /// Hand the store back, e.g. to reopen the session later.
    pub fn into_store(self) -> S {
        self.store
    }

    fn save_ledger(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.ledger).context("serializing ledger")?;
        self.store.save(Slot::Ledger, &raw)
    }
}
