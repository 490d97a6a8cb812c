//! Client-side table model for the voter list: text filters, single-column
//! sorting, column visibility and pagination over the full list returned by
//! the backend.

use crate::features::voters::types::Voter;
use std::{cmp::Ordering, collections::HashSet};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoterColumn {
    FullName,
    Email,
    Gender,
    Department,
    MatriculationNumber,
}

impl VoterColumn {
    pub const ALL: [VoterColumn; 5] = [
        VoterColumn::FullName,
        VoterColumn::Email,
        VoterColumn::Gender,
        VoterColumn::Department,
        VoterColumn::MatriculationNumber,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            VoterColumn::FullName => "Full Name",
            VoterColumn::Email => "Email",
            VoterColumn::Gender => "Gender",
            VoterColumn::Department => "Department",
            VoterColumn::MatriculationNumber => "Matriculation Number",
        }
    }

    #[must_use]
    pub fn is_sortable(self) -> bool {
        matches!(
            self,
            VoterColumn::FullName | VoterColumn::Email | VoterColumn::MatriculationNumber
        )
    }

    #[must_use]
    pub fn value(self, voter: &Voter) -> &str {
        match self {
            VoterColumn::FullName => &voter.full_name,
            VoterColumn::Email => &voter.email,
            VoterColumn::Gender => &voter.gender,
            VoterColumn::Department => &voter.department,
            VoterColumn::MatriculationNumber => &voter.matriculation_number,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Substring filters; empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoterFilters {
    pub name: String,
    pub email: String,
    pub department: String,
}

impl VoterFilters {
    fn matches(&self, voter: &Voter) -> bool {
        contains_ignore_case(&voter.full_name, &self.name)
            && contains_ignore_case(&voter.email, &self.email)
            && contains_ignore_case(&voter.department, &self.department)
    }
}

fn contains_ignore_case(value: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || value.to_lowercase().contains(&needle.to_lowercase())
}

/// One page of filtered, sorted rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterPage {
    pub rows: Vec<Voter>,
    pub page: usize,
    pub page_count: usize,
    pub matching: usize,
}

impl VoterPage {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoterQuery {
    filters: VoterFilters,
    sort: Option<(VoterColumn, SortDirection)>,
    hidden_columns: HashSet<VoterColumn>,
    page: usize,
    page_size: usize,
}

impl Default for VoterQuery {
    fn default() -> Self {
        Self {
            filters: VoterFilters::default(),
            sort: None,
            hidden_columns: HashSet::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl VoterQuery {
    #[must_use]
    pub fn filters(&self) -> &VoterFilters {
        &self.filters
    }

    /// Replaces the filters and returns to the first page.
    pub fn set_filters(&mut self, filters: VoterFilters) {
        self.filters = filters;
        self.page = 0;
    }

    pub fn set_name_filter(&mut self, name: &str) {
        self.filters.name = name.to_string();
        self.page = 0;
    }

    #[must_use]
    pub fn sort(&self) -> Option<(VoterColumn, SortDirection)> {
        self.sort
    }

    /// Header click: ascending first, then flips on each click of the same
    /// column. Unsortable columns are ignored.
    pub fn toggle_sort(&mut self, column: VoterColumn) {
        if !column.is_sortable() {
            return;
        }
        let direction = match self.sort {
            Some((current, SortDirection::Ascending)) if current == column => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.sort = Some((column, direction));
    }

    pub fn set_column_visible(&mut self, column: VoterColumn, visible: bool) {
        if visible {
            self.hidden_columns.remove(&column);
        } else {
            self.hidden_columns.insert(column);
        }
    }

    #[must_use]
    pub fn is_visible(&self, column: VoterColumn) -> bool {
        !self.hidden_columns.contains(&column)
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<VoterColumn> {
        VoterColumn::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Moves one page past `shown`, staying on the last page.
    pub fn next_page(&mut self, shown: &VoterPage) {
        self.page = (shown.page + 1).min(shown.page_count.saturating_sub(1));
    }

    /// Moves one page before `shown`. Steps from the clamped page, so a stale
    /// index left behind by a shrinking list is discarded.
    pub fn previous_page(&mut self, shown: &VoterPage) {
        self.page = shown.page.saturating_sub(1);
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Filters, sorts and slices `voters`. A page past the end clamps to the
    /// last page.
    #[must_use]
    pub fn apply(&self, voters: &[Voter]) -> VoterPage {
        let mut rows: Vec<&Voter> = voters
            .iter()
            .filter(|voter| self.filters.matches(voter))
            .collect();

        if let Some((column, direction)) = self.sort {
            rows.sort_by(|left, right| {
                let ordering = compare_text(column.value(left), column.value(right));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let matching = rows.len();
        let page_count = matching.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);
        let rows = rows
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        VoterPage {
            rows,
            page,
            page_count,
            matching,
        }
    }
}

fn compare_text(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

/// Headline numbers shown above the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoterStats {
    pub total: usize,
    pub departments: usize,
}

impl VoterStats {
    #[must_use]
    pub fn from_voters(voters: &[Voter]) -> Self {
        let departments: HashSet<&str> = voters.iter().map(|voter| voter.department.as_str()).collect();
        Self {
            total: voters.len(),
            departments: departments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, VoterColumn, VoterFilters, VoterQuery, VoterStats};
    use crate::features::voters::types::Voter;

    fn voter(name: &str, email: &str, department: &str, matric: &str) -> Voter {
        Voter {
            id: format!("voter_{matric}"),
            email: email.to_string(),
            gender: "F".to_string(),
            full_name: name.to_string(),
            department: department.to_string(),
            matriculation_number: matric.to_string(),
            created_at: None,
        }
    }

    fn sample() -> Vec<Voter> {
        vec![
            voter("Chidi Okafor", "chidi@uni.edu", "Physics", "PHY/003"),
            voter("ada Lovelace", "ada@uni.edu", "Computer Science", "CSC/001"),
            voter("Bola Ade", "bola@uni.edu", "Computer Science", "CSC/002"),
        ]
    }

    fn names(page: &super::VoterPage) -> Vec<&str> {
        page.rows.iter().map(|voter| voter.full_name.as_str()).collect()
    }

    #[test]
    fn name_filter_is_case_insensitive() {
        let mut query = VoterQuery::default();
        query.set_name_filter("AD");

        let page = query.apply(&sample());
        assert_eq!(names(&page), ["ada Lovelace", "Bola Ade"]);
        assert_eq!(page.matching, 2);
    }

    #[test]
    fn all_filters_must_match() {
        let mut query = VoterQuery::default();
        query.set_filters(VoterFilters {
            name: "a".to_string(),
            email: String::new(),
            department: "physics".to_string(),
        });

        assert_eq!(names(&query.apply(&sample())), ["Chidi Okafor"]);
    }

    #[test]
    fn sorting_toggles_between_directions() {
        let mut query = VoterQuery::default();
        query.toggle_sort(VoterColumn::FullName);
        assert_eq!(query.sort(), Some((VoterColumn::FullName, SortDirection::Ascending)));
        assert_eq!(
            names(&query.apply(&sample())),
            ["ada Lovelace", "Bola Ade", "Chidi Okafor"]
        );

        query.toggle_sort(VoterColumn::FullName);
        assert_eq!(
            names(&query.apply(&sample())),
            ["Chidi Okafor", "Bola Ade", "ada Lovelace"]
        );

        query.toggle_sort(VoterColumn::FullName);
        assert_eq!(query.sort(), Some((VoterColumn::FullName, SortDirection::Ascending)));
    }

    #[test]
    fn switching_columns_starts_ascending() {
        let mut query = VoterQuery::default();
        query.toggle_sort(VoterColumn::FullName);
        query.toggle_sort(VoterColumn::FullName);
        query.toggle_sort(VoterColumn::MatriculationNumber);

        assert_eq!(
            query.sort(),
            Some((VoterColumn::MatriculationNumber, SortDirection::Ascending))
        );
        assert_eq!(
            names(&query.apply(&sample())),
            ["ada Lovelace", "Bola Ade", "Chidi Okafor"]
        );
    }

    #[test]
    fn unsortable_columns_are_ignored() {
        let mut query = VoterQuery::default();
        query.toggle_sort(VoterColumn::Department);
        assert_eq!(query.sort(), None);
    }

    #[test]
    fn pagination_clamps_to_the_last_page() {
        let voters: Vec<Voter> = (0..23)
            .map(|index| voter(&format!("Voter {index:02}"), "v@uni.edu", "Law", &index.to_string()))
            .collect();
        let mut query = VoterQuery::default();

        let first = query.apply(&voters);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.rows.len(), 10);
        assert!(!first.has_previous());
        assert!(first.has_next());

        query.next_page(&first);
        let second = query.apply(&voters);
        query.next_page(&second);
        let last = query.apply(&voters);
        assert_eq!(last.page, 2);
        assert_eq!(last.rows.len(), 3);
        assert!(!last.has_next());

        query.next_page(&last);
        assert_eq!(query.page(), 2);

        let shrunk = query.apply(&voters[..12]);
        assert_eq!(shrunk.page, 1);
        assert_eq!(shrunk.rows.len(), 2);
        query.previous_page(&shrunk);
        assert_eq!(query.page(), 0);

        let first = query.apply(&voters);
        query.next_page(&first);
        query.set_name_filter("voter");
        assert_eq!(query.page(), 0);
    }

    #[test]
    fn changing_the_page_size_starts_over() {
        let voters: Vec<Voter> = (0..23)
            .map(|index| voter(&format!("Voter {index:02}"), "v@uni.edu", "Law", &index.to_string()))
            .collect();
        let mut query = VoterQuery::default();
        let first = query.apply(&voters);
        query.next_page(&first);

        query.set_page_size(20);
        let page = query.apply(&voters);
        assert_eq!(query.page_size(), 20);
        assert_eq!(page.page, 0);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.rows.len(), 20);

        query.set_page_size(0);
        assert_eq!(query.page_size(), 1);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        let page = VoterQuery::default().apply(&[]);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn hidden_columns_drop_out_of_the_view() {
        let mut query = VoterQuery::default();
        query.set_column_visible(VoterColumn::Gender, false);
        query.set_column_visible(VoterColumn::Email, false);
        query.set_column_visible(VoterColumn::Email, true);

        assert_eq!(
            query.visible_columns(),
            [
                VoterColumn::FullName,
                VoterColumn::Email,
                VoterColumn::Department,
                VoterColumn::MatriculationNumber
            ]
        );
    }

    #[test]
    fn stats_count_distinct_departments() {
        let stats = VoterStats::from_voters(&sample());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.departments, 2);
        assert_eq!(VoterStats::from_voters(&[]), VoterStats::default());
    }
}
