/// Streak engine property tests
use habitron::*;
use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Build an entry for `day` carrying the given flags for the given habits
fn entry_for(day: &str, habits: &[HabitId], flags: &[bool]) -> DateEntry {
    let completions = habits
        .iter()
        .zip(flags.iter())
        .map(|(habit_id, &completed)| HabitCompletion {
            habit_id: habit_id.clone(),
            completed,
        })
        .collect();
    DateEntry::from_existing(EntryId::new(), date(day), completions, false, 0)
}

#[test]
fn test_two_habit_scenario() {
    // Day one all done, day two misses a habit, day three all done again.
    let habits = vec![HabitId::new(), HabitId::new()];
    let entries = vec![
        entry_for("2025-01-01", &habits, &[true, true]),
        entry_for("2025-01-02", &habits, &[true, false]),
        entry_for("2025-01-03", &habits, &[true, true]),
    ];

    let annotated = compute_streaks(entries);

    let streaks: Vec<u32> = annotated.iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 0, 1]);

    let flags: Vec<bool> = annotated.iter().map(|e| e.all_completed).collect();
    assert_eq!(flags, vec![true, false, true]);
}

#[test]
fn test_output_length_equals_input_length() {
    let habits = vec![HabitId::new()];
    for count in 0..6 {
        let entries: Vec<DateEntry> = (1..=count)
            .map(|day| entry_for(&format!("2025-01-{:02}", day), &habits, &[day % 2 == 0]))
            .collect();

        let annotated = compute_streaks(entries);
        assert_eq!(annotated.len(), count as usize);
    }
}

#[test]
fn test_streak_zero_whenever_not_fully_completed() {
    let habits = vec![HabitId::new(), HabitId::new()];
    let entries = vec![
        entry_for("2025-01-01", &habits, &[true, true]),
        entry_for("2025-01-02", &habits, &[false, true]),
        entry_for("2025-01-03", &habits, &[false, false]),
        entry_for("2025-01-04", &habits, &[true, true]),
    ];

    for entry in compute_streaks(entries) {
        if !entry.all_completed {
            assert_eq!(entry.streak_days, 0);
        } else {
            assert!(entry.streak_days >= 1);
        }
    }
}

#[test]
fn test_idempotence() {
    let habits = vec![HabitId::new()];
    let entries = vec![
        entry_for("2025-01-01", &habits, &[true]),
        entry_for("2025-01-02", &habits, &[true]),
        entry_for("2025-01-04", &habits, &[true]),
        entry_for("2025-01-05", &habits, &[false]),
    ];

    let once = compute_streaks(entries);
    let twice = compute_streaks(once.clone());

    for (a, b) in once.iter().zip(twice.iter()) {
        assert_eq!(a.all_completed, b.all_completed);
        assert_eq!(a.streak_days, b.streak_days);
    }
}

#[test]
fn test_monotonic_chain() {
    let habits = vec![HabitId::new()];
    let entries = vec![
        entry_for("2025-06-10", &habits, &[true]),
        entry_for("2025-06-11", &habits, &[true]),
        entry_for("2025-06-12", &habits, &[true]),
    ];

    let streaks: Vec<u32> = compute_streaks(entries).iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 2, 3]);
}

#[test]
fn test_gap_reset() {
    // D and D+2 are both perfect days, but D+1 was never tracked.
    let habits = vec![HabitId::new()];
    let entries = vec![
        entry_for("2025-06-10", &habits, &[true]),
        entry_for("2025-06-12", &habits, &[true]),
    ];

    let streaks: Vec<u32> = compute_streaks(entries).iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 1]);
}

#[test]
fn test_empty_completions_guard() {
    let entries = vec![DateEntry::from_existing(
        EntryId::new(),
        date("2025-06-10"),
        Vec::new(),
        false,
        0,
    )];

    let annotated = compute_streaks(entries);
    assert!(!annotated[0].all_completed);
    assert_eq!(annotated[0].streak_days, 0);
}

#[test]
fn test_non_derived_fields_pass_through() {
    let habits = vec![HabitId::new()];
    let original = entry_for("2025-06-10", &habits, &[true]);
    let id = original.id.clone();

    let annotated = compute_streaks(vec![original]);
    assert_eq!(annotated[0].id, id);
    assert_eq!(annotated[0].date, date("2025-06-10"));
    assert_eq!(annotated[0].completions.len(), 1);
    assert_eq!(annotated[0].completions[0].habit_id, habits[0]);
}

#[test]
fn test_insertion_order_does_not_matter() {
    let habits = vec![HabitId::new()];
    let forward = vec![
        entry_for("2025-06-10", &habits, &[true]),
        entry_for("2025-06-11", &habits, &[true]),
        entry_for("2025-06-12", &habits, &[false]),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    let annotated_forward = compute_streaks(forward);
    let annotated_backward = compute_streaks(backward);

    let streaks_forward: Vec<u32> = annotated_forward.iter().map(|e| e.streak_days).collect();
    let streaks_backward: Vec<u32> = annotated_backward.iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks_forward, streaks_backward);
}

#[test]
fn test_year_boundary_chain() {
    let habits = vec![HabitId::new()];
    let entries = vec![
        entry_for("2024-12-31", &habits, &[true]),
        entry_for("2025-01-01", &habits, &[true]),
    ];

    let streaks: Vec<u32> = compute_streaks(entries).iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 2]);
}

#[test]
fn test_summary_helpers() {
    let habits = vec![HabitId::new()];
    let entries = compute_streaks(vec![
        entry_for("2025-06-10", &habits, &[true]),
        entry_for("2025-06-11", &habits, &[true]),
        entry_for("2025-06-13", &habits, &[true]),
    ]);

    // Best chain is the two-day run; the latest day stands alone.
    assert_eq!(longest_streak(&entries), 2);
    assert_eq!(current_streak(&entries), 1);
}
