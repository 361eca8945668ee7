//! Loan lifecycle rules.
//!
//! Everything here is pure: the functions take lists already fetched from the Catalog Store
//! and the current date, and never perform I/O. OVERDUE is never stored by this crate; it is
//! derived on read by [`derive_effective_status`].

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::copies::domain::model::CopyEntity;
use crate::core::library::{CopyStatus, LibraryError, LibraryResult, LoanStatus};
use crate::core::listing::{compare_dates, FilterField, Listable, ListQuery, matches_search};
use crate::loans::domain::model::LoanEntity;
use crate::members::domain::model::MemberEntity;
use crate::utils::date::serializer;

const MISSING: &str = "N/A";

// New-loan form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewLoan {
    pub member_id: Option<String>,
    pub book_copy_ids: Vec<String>,
    #[serde(with = "serializer")]
    pub loan_date: Option<NaiveDate>,
    #[serde(with = "serializer")]
    pub due_date: Option<NaiveDate>,
}

impl NewLoan {
    pub fn new(member_id: &str, book_copy_ids: &[&str], loan_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            member_id: Some(member_id.to_string()),
            book_copy_ids: book_copy_ids.iter().map(|id| id.to_string()).collect(),
            loan_date: Some(loan_date),
            due_date: Some(due_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Loan,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub title: String,
    pub user: String,
    #[serde(with = "serializer")]
    pub date: Option<NaiveDate>,
}

// A loan together with what the screens show for it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    #[serde(flatten)]
    pub loan: LoanEntity,
    pub effective_status: LoanStatus,
    pub status_label: String,
    pub overdue: bool,
}

impl Listable for LoanView {
    fn search_fields(&self) -> Vec<Option<&str>> {
        self.loan.search_fields()
    }

    fn sort_date(&self) -> Option<NaiveDate> {
        self.loan.loan_date
    }

    fn filter_value(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Status => Some(self.effective_status.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoanRow {
    pub member: MemberEntity,
    pub loans: Vec<LoanView>,
    pub open_loans: usize,
    #[serde(with = "serializer")]
    pub latest_loan_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub books_count: usize,
    pub book_copies_count: usize,
    pub members_count: usize,
    pub open_loans_count: usize,
    pub late_loans_count: usize,
    pub recent_activity: Vec<ActivityEntry>,
}

/// An inconsistency between loans and copies found in fetched data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InvariantViolation {
    // copy is BORROWED but no open loan holds it
    #[serde(rename_all = "camelCase")]
    BorrowedWithoutLoan { copy_id: String },
    // an open loan holds a copy that is not BORROWED, or no longer exists
    #[serde(rename_all = "camelCase")]
    LoanedCopyNotBorrowed { loan_id: String, copy_id: String, copy_status: Option<CopyStatus> },
    #[serde(rename_all = "camelCase")]
    ReturnDateMismatch { loan_id: String, status: LoanStatus, return_date: Option<NaiveDate> },
    #[serde(rename_all = "camelCase")]
    DateOrder { loan_id: String, field: String },
    #[serde(rename_all = "camelCase")]
    SharedCopy { copy_id: String, loan_ids: Vec<String> },
}

pub fn derive_effective_status(loan: &LoanEntity, today: NaiveDate) -> LoanStatus {
    match (loan.status, loan.due_date) {
        (LoanStatus::Active, Some(due)) if due < today => LoanStatus::Overdue,
        (status, _) => status,
    }
}

pub fn derive_status_label(loan: &LoanEntity) -> &'static str {
    loan.status.label()
}

pub fn view(loan: &LoanEntity, today: NaiveDate) -> LoanView {
    let effective_status = derive_effective_status(loan, today);
    LoanView {
        loan: loan.clone(),
        effective_status,
        status_label: effective_status.label().to_string(),
        overdue: effective_status == LoanStatus::Overdue,
    }
}

// Applies one transition of the state machine to a local record.
pub fn transition(loan: &LoanEntity, next: LoanStatus, today: NaiveDate) -> LibraryResult<LoanEntity> {
    if !loan.status.can_transition_to(next) {
        return Err(LibraryError::conflict(
            format!("loan {} cannot go from {} to {}", loan.id, loan.status, next).as_str(), None));
    }
    let mut updated = loan.clone();
    updated.status = next;
    if next == LoanStatus::Returned {
        updated.return_date = Some(today);
    }
    Ok(updated)
}

pub fn aggregate_by_member(loans: &[LoanEntity], members: &[MemberEntity]) -> HashMap<String, Vec<LoanEntity>> {
    let mut by_member: HashMap<String, Vec<LoanEntity>> = members.iter()
        .map(|m| (m.id.to_string(), vec![]))
        .collect();
    for loan in loans {
        by_member.entry(loan.member.id.to_string()).or_default().push(loan.clone());
    }
    by_member
}

pub fn compute_recent_activity(loans: &[LoanEntity], limit: usize, today: NaiveDate) -> Vec<ActivityEntry> {
    let mut sorted: Vec<&LoanEntity> = loans.iter().collect();
    sorted.sort_by(|a, b| b.loan_date.unwrap_or(today).cmp(&a.loan_date.unwrap_or(today)));
    sorted.into_iter()
        .take(limit)
        .map(|loan| ActivityEntry {
            kind: if loan.status == LoanStatus::Returned { ActivityType::Return } else { ActivityType::Loan },
            title: loan.title().unwrap_or(MISSING).to_string(),
            user: loan.member.name.clone().unwrap_or_else(|| MISSING.to_string()),
            date: Some(loan.loan_date.unwrap_or(today)),
        })
        .collect()
}

// Local checks run before anything is sent; returns the loan to submit.
pub fn validate_new_loan(req: &NewLoan) -> LibraryResult<LoanEntity> {
    let member_id = req.member_id.as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| LibraryError::validation("Sélectionne au moins 1 livre et un lecteur.", Some("memberId".to_string())))?;
    if req.book_copy_ids.is_empty() {
        return Err(LibraryError::validation("Sélectionne au moins 1 livre et un lecteur.", Some("bookCopyIds".to_string())));
    }
    let mut seen = HashSet::new();
    let mut copy_ids = Vec::with_capacity(req.book_copy_ids.len());
    for raw in &req.book_copy_ids {
        let id = raw.trim();
        if id.is_empty() {
            return Err(LibraryError::validation("blank book copy id", Some("bookCopyIds".to_string())));
        }
        if !seen.insert(id) {
            return Err(LibraryError::validation(
                format!("book copy {} selected twice", id).as_str(), Some("bookCopyIds".to_string())));
        }
        copy_ids.push(id.to_string());
    }
    let loan_date = req.loan_date
        .ok_or_else(|| LibraryError::validation("loan date is required", Some("loanDate".to_string())))?;
    let due_date = req.due_date
        .ok_or_else(|| LibraryError::validation("due date is required", Some("dueDate".to_string())))?;
    if due_date < loan_date {
        return Err(LibraryError::validation(
            format!("due date {} is before loan date {}", due_date, loan_date).as_str(), Some("dueDate".to_string())));
    }
    Ok(LoanEntity::new(member_id, &copy_ids, loan_date, due_date))
}

pub fn ensure_copies_available(requested: &[&str], copies: &[CopyEntity]) -> LibraryResult<()> {
    for id in requested {
        let copy = copies.iter().find(|c| c.id == *id)
            .ok_or_else(|| LibraryError::not_found(format!("book copy {} not found", id).as_str()))?;
        if copy.status != CopyStatus::Available {
            return Err(LibraryError::conflict(
                format!("book copy {} is {}", id, copy.status.label()).as_str(), Some(copy.status.to_string())));
        }
    }
    Ok(())
}

pub fn check_invariants(loans: &[LoanEntity], copies: &[CopyEntity]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut holders: Vec<(&str, Vec<String>)> = Vec::new();
    for loan in loans.iter().filter(|l| l.status.is_open()) {
        for copy_id in loan.copy_ids() {
            match holders.iter_mut().find(|(id, _)| *id == copy_id) {
                Some((_, loan_ids)) => loan_ids.push(loan.id.to_string()),
                None => holders.push((copy_id, vec![loan.id.to_string()])),
            }
        }
    }

    for copy in copies.iter().filter(|c| c.status == CopyStatus::Borrowed) {
        if !holders.iter().any(|(id, _)| *id == copy.id) {
            violations.push(InvariantViolation::BorrowedWithoutLoan { copy_id: copy.id.to_string() });
        }
    }

    for loan in loans {
        if loan.status.is_open() {
            for copy_id in loan.copy_ids() {
                let status = copies.iter().find(|c| c.id == copy_id).map(|c| c.status);
                if status != Some(CopyStatus::Borrowed) {
                    violations.push(InvariantViolation::LoanedCopyNotBorrowed {
                        loan_id: loan.id.to_string(),
                        copy_id: copy_id.to_string(),
                        copy_status: status,
                    });
                }
            }
        }
        if loan.return_date.is_some() != (loan.status == LoanStatus::Returned) {
            violations.push(InvariantViolation::ReturnDateMismatch {
                loan_id: loan.id.to_string(),
                status: loan.status,
                return_date: loan.return_date,
            });
        }
        if let Some(loan_date) = loan.loan_date {
            if loan.due_date.map(|d| d < loan_date).unwrap_or(false) {
                violations.push(InvariantViolation::DateOrder { loan_id: loan.id.to_string(), field: "dueDate".to_string() });
            }
            if loan.return_date.map(|d| d < loan_date).unwrap_or(false) {
                violations.push(InvariantViolation::DateOrder { loan_id: loan.id.to_string(), field: "returnDate".to_string() });
            }
        }
    }

    for (copy_id, loan_ids) in holders {
        if loan_ids.len() > 1 {
            violations.push(InvariantViolation::SharedCopy { copy_id: copy_id.to_string(), loan_ids });
        }
    }
    violations
}

pub fn member_loan_rows(members: &[MemberEntity], loans: &[LoanEntity],
                        query: &ListQuery, today: NaiveDate) -> Vec<MemberLoanRow> {
    let by_member = aggregate_by_member(loans, members);
    let term = query.search_term();
    let status_filter = query.filter(FilterField::Status).map(|s| LoanStatus::from(s.to_string()));

    let mut rows: Vec<MemberLoanRow> = members.iter()
        .filter(|m| matches_search(*m, term.as_deref()))
        .map(|member| {
            let loans: Vec<LoanView> = by_member.get(&member.id)
                .map(|loans| loans.iter().map(|l| view(l, today)).collect())
                .unwrap_or_default();
            MemberLoanRow {
                member: member.clone(),
                open_loans: loans.iter().filter(|l| l.loan.status.is_open()).count(),
                latest_loan_date: loans.iter().filter_map(|l| l.loan.loan_date).max(),
                loans,
            }
        })
        .filter(|row| match status_filter {
            None => true,
            Some(status) => row.loans.iter().any(|l| l.effective_status == status),
        })
        .collect();

    rows.sort_by(|a, b| match (a.loans.is_empty(), b.loans.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => compare_dates(a.latest_loan_date, b.latest_loan_date, query.sort),
    });
    rows
}

pub fn dashboard(books_count: usize, copies_count: usize, members: &[MemberEntity], loans: &[LoanEntity],
                 recent_limit: usize, today: NaiveDate) -> DashboardView {
    DashboardView {
        books_count,
        book_copies_count: copies_count,
        members_count: members.len(),
        open_loans_count: loans.iter().filter(|l| l.status.is_open()).count(),
        late_loans_count: loans.iter()
            .filter(|l| derive_effective_status(l, today) == LoanStatus::Overdue)
            .count(),
        recent_activity: compute_recent_activity(loans, recent_limit, today),
    }
}
