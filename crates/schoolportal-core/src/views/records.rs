use crate::models::AcademicRecord;

/// Colour band for a letter grade, by its first letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    Other,
}

impl GradeBand {
    pub fn of(grade: &str) -> Self {
        match grade.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => GradeBand::A,
            Some('B') => GradeBand::B,
            Some('C') => GradeBand::C,
            Some('D') => GradeBand::D,
            _ => GradeBand::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct YearGroup {
    pub year: i32,
    pub records: Vec<AcademicRecord>,
}

impl YearGroup {
    pub fn average_marks(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self.records.iter().map(|r| r.marks).sum();
        Some(total / self.records.len() as f64)
    }
}

/// Group records by year, newest first. Within a year, semesters ascend and
/// the backend's order is kept inside a semester.
pub fn group_by_year(records: &[AcademicRecord]) -> Vec<YearGroup> {
    let mut sorted: Vec<AcademicRecord> = records.to_vec();
    sorted.sort_by(|a, b| b.year.cmp(&a.year).then(a.semester.cmp(&b.semester)));

    let mut groups: Vec<YearGroup> = Vec::new();
    for record in sorted {
        match groups.last_mut() {
            Some(group) if group.year == record.year => group.records.push(record),
            _ => groups.push(YearGroup {
                year: record.year,
                records: vec![record],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, subject: &str, year: i32, semester: u8, marks: f64, grade: &str) -> AcademicRecord {
        AcademicRecord {
            record_id: id.to_string(),
            subject: subject.to_string(),
            year,
            semester,
            marks,
            grade: grade.to_string(),
        }
    }

    #[test]
    fn test_group_by_year_ordering() {
        let records = vec![
            record("6", "Mathematics", 2023, 2, 82.0, "A-"),
            record("1", "Mathematics", 2024, 2, 85.0, "A"),
            record("2", "Science", 2024, 1, 78.0, "B+"),
            record("3", "English", 2024, 1, 92.0, "A+"),
        ];
        let groups = group_by_year(&records);
        assert_eq!(groups.iter().map(|g| g.year).collect::<Vec<_>>(), vec![2024, 2023]);

        let ids: Vec<&str> = groups[0].records.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_average_marks() {
        let groups = group_by_year(&[
            record("1", "Hindi", 2024, 1, 90.0, "A+"),
            record("2", "Science", 2024, 1, 80.0, "B"),
        ]);
        assert_eq!(groups[0].average_marks(), Some(85.0));
        assert!(group_by_year(&[]).is_empty());
    }

    #[test]
    fn test_grade_band() {
        assert_eq!(GradeBand::of("A+"), GradeBand::A);
        assert_eq!(GradeBand::of("b-"), GradeBand::B);
        assert_eq!(GradeBand::of("C"), GradeBand::C);
        assert_eq!(GradeBand::of("D"), GradeBand::D);
        assert_eq!(GradeBand::of("F"), GradeBand::Other);
        assert_eq!(GradeBand::of(""), GradeBand::Other);
    }
}
