//! Split calculation for expenses.
//!
//! Turns a total amount, a split type and either the eligible member list or
//! caller-supplied raw shares into the per-member owed amounts stored on an
//! expense. Pure and synchronous; used on both create and update.
//!
//! - **equal**: `total / members`, assigned in the order supplied. No cent
//!   correction here; drift is absorbed when balances are rounded.
//! - **unequal**: raw shares are amounts and must sum to the total.
//! - **percentage**: raw shares are percentages, must sum to 100 and are
//!   converted with full precision.

use std::collections::HashSet;

use log::debug;

use crate::domain::error::SplitError;
use crate::domain::models::expense::{RawShare, SplitDetail, SplitType};

const FULL_PERCENTAGE: f64 = 100.0;

/// Validates raw shares and derives split details.
///
/// `tolerance` bounds how far the sum of shares may drift from the required
/// total. Zero keeps the strict equality check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitCalculator {
    tolerance: f64,
}

impl Default for SplitCalculator {
    fn default() -> Self {
        Self::strict()
    }
}

impl SplitCalculator {
    pub fn strict() -> Self {
        Self { tolerance: 0.0 }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn compute_splits(
        &self,
        split_type: SplitType,
        total_amount: f64,
        eligible_members: &[String],
        raw_shares: &[RawShare],
    ) -> Result<Vec<SplitDetail>, SplitError> {
        debug!(
            "Computing {} split of {:.2} over {} members ({} raw shares)",
            split_type,
            total_amount,
            eligible_members.len(),
            raw_shares.len()
        );

        match split_type {
            SplitType::Equal => Self::equal_split(total_amount, eligible_members),
            SplitType::Unequal => {
                let sum: f64 = raw_shares.iter().map(|s| s.value).sum();
                if !self.matches(sum, total_amount) {
                    return Err(SplitError::UnequalSumMismatch {
                        expected: total_amount,
                        actual: sum,
                    });
                }
                Self::check_members(eligible_members, raw_shares)?;
                Ok(raw_shares
                    .iter()
                    .map(|s| SplitDetail::new(s.member_id.clone(), s.value))
                    .collect())
            }
            SplitType::Percentage => {
                let sum: f64 = raw_shares.iter().map(|s| s.value).sum();
                if !self.matches(sum, FULL_PERCENTAGE) {
                    return Err(SplitError::PercentageSumMismatch { actual: sum });
                }
                Self::check_members(eligible_members, raw_shares)?;
                Ok(raw_shares
                    .iter()
                    .map(|s| {
                        SplitDetail::new(s.member_id.clone(), total_amount * s.value / FULL_PERCENTAGE)
                    })
                    .collect())
            }
        }
    }

    /// Parses the split type before computing, so unknown names surface as
    /// `InvalidSplitType`
    pub fn compute_splits_named(
        &self,
        split_type: &str,
        total_amount: f64,
        eligible_members: &[String],
        raw_shares: &[RawShare],
    ) -> Result<Vec<SplitDetail>, SplitError> {
        let split_type = split_type.parse::<SplitType>()?;
        self.compute_splits(split_type, total_amount, eligible_members, raw_shares)
    }

    fn equal_split(total_amount: f64, members: &[String]) -> Result<Vec<SplitDetail>, SplitError> {
        if members.is_empty() {
            return Err(SplitError::NoEligibleMembers);
        }
        let share = total_amount / members.len() as f64;
        Ok(members
            .iter()
            .map(|member| SplitDetail::new(member.clone(), share))
            .collect())
    }

    fn matches(&self, actual: f64, required: f64) -> bool {
        (actual - required).abs() <= self.tolerance
    }

    fn check_members(eligible_members: &[String], raw_shares: &[RawShare]) -> Result<(), SplitError> {
        let eligible: HashSet<&str> = eligible_members.iter().map(String::as_str).collect();
        let mut seen = HashSet::with_capacity(raw_shares.len());
        for share in raw_shares {
            if !seen.insert(share.member_id.as_str()) {
                return Err(SplitError::DuplicateMember(share.member_id.clone()));
            }
            if !eligible.contains(share.member_id.as_str()) {
                return Err(SplitError::MemberNotInScope(share.member_id.clone()));
            }
        }
        Ok(())
    }
}
