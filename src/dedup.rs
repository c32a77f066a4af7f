use crate::record::Record;
use std::collections::HashSet;

/// How empty `Email` / `Phone Number` values take part in duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyKeyPolicy {
    /// `""` is a key like any other: once a retained record had an empty
    /// phone, every later record with an empty phone is a duplicate.
    #[default]
    Collide,
    /// Empty values are never recorded and never match.
    Distinct,
}

/// Why a record was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupOutcome {
    Retained,
    DuplicateEmail,
    DuplicatePhone,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DedupStats {
    pub retained: usize,
    pub duplicate_email: usize,
    pub duplicate_phone: usize,
}

impl DedupStats {
    pub fn dropped(&self) -> usize {
        self.duplicate_email + self.duplicate_phone
    }
}

///
/// First-occurrence-wins index over the emails and phone numbers of every
/// retained record. Records must be fed in input order; one instance serves
/// one run.
///
#[derive(Debug, Default)]
pub struct Deduplicator {
    policy: EmptyKeyPolicy,
    /// Emails of records retained so far
    seen_emails: HashSet<String>,
    /// Phone numbers of records retained so far
    seen_phones: HashSet<String>,
    stats: DedupStats,
}

impl Deduplicator {
    pub fn new(policy: EmptyKeyPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    fn counts(&self, key: &str) -> bool {
        !(key.is_empty() && self.policy == EmptyKeyPolicy::Distinct)
    }

    ///
    /// Decide on one record. A retained record registers both of its keys, so a
    /// later record matching on either one is caught.
    ///
    pub fn admit(&mut self, record: &Record) -> DedupOutcome {
        let (email, phone) = (record.email(), record.phone());

        let outcome = if self.counts(email) && self.seen_emails.contains(email) {
            DedupOutcome::DuplicateEmail
        } else if self.counts(phone) && self.seen_phones.contains(phone) {
            DedupOutcome::DuplicatePhone
        } else {
            DedupOutcome::Retained
        };

        match outcome {
            DedupOutcome::Retained => {
                if self.counts(email) {
                    self.seen_emails.insert(email.to_owned());
                }
                if self.counts(phone) {
                    self.seen_phones.insert(phone.to_owned());
                }
                self.stats.retained += 1;
            }
            DedupOutcome::DuplicateEmail => {
                tracing::debug!(email, "dropping duplicate email");
                self.stats.duplicate_email += 1;
            }
            DedupOutcome::DuplicatePhone => {
                tracing::debug!(phone, "dropping duplicate phone");
                self.stats.duplicate_phone += 1;
            }
        }
        outcome
    }

    /// Keep the first record for every email and phone, in input order.
    pub fn dedupe(&mut self, records: Vec<Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| self.admit(record) == DedupOutcome::Retained)
            .collect()
    }

    pub fn stats(&self) -> DedupStats {
        self.stats
    }
}

/// One-shot dedupe with a fresh index.
pub fn dedupe(records: Vec<Record>, policy: EmptyKeyPolicy) -> Vec<Record> {
    Deduplicator::new(policy).dedupe(records)
}
