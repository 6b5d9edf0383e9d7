use crate::models::user::UserFacts;

/// Number of items on the profile checklist.
pub const CHECKLIST_LEN: usize = 9;

/// Percentage of the profile checklist the user has filled, floored.
///
/// Checklist: first name, last name, email, profile picture, resume, GPA,
/// at least one skill, at least one reference, at least one education entry.
pub fn profile_completion_percentage(facts: &UserFacts) -> i32 {
    let p = &facts.profile;
    let checklist: [bool; CHECKLIST_LEN] = [
        !p.first_name.is_empty(),
        !p.last_name.is_empty(),
        !p.email.is_empty(),
        is_present(p.profile_picture.as_deref()),
        is_present(p.resume_key.as_deref()),
        p.gpa.is_some(),
        facts.skill_count > 0,
        facts.reference_count > 0,
        facts.education_count > 0,
    ];
    let filled = checklist.iter().filter(|present| **present).count();
    (filled * 100 / CHECKLIST_LEN) as i32
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
