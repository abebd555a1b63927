use crate::models::StudentSummary;

/// Search box state for the admin students list.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub query: String,
}

impl StudentFilter {
    pub fn apply<'a>(&self, students: &'a [StudentSummary]) -> Vec<&'a StudentSummary> {
        students.iter().filter(|s| s.matches(&self.query)).collect()
    }

    pub fn summary_line(shown: usize, total: usize) -> String {
        format!("Showing {} of {} students", shown, total)
    }
}
