/// Domain type validation tests
use habitron::*;
use chrono::NaiveDate;

#[test]
fn test_habit_validation() {
    assert!(Habit::new("Morning Run".to_string(), "🏃".to_string()).is_ok());
    assert!(Habit::new("".to_string(), "🏃".to_string()).is_err());
    assert!(Habit::new("x".repeat(101), "🏃".to_string()).is_err());
    assert!(Habit::new("Run".to_string(), "way too long".to_string()).is_err());
}

#[test]
fn test_itinerary_validation() {
    assert!(ItineraryItem::new("Gym".to_string(), None).is_ok());
    assert!(ItineraryItem::new(" ".to_string(), None).is_err());
    assert!(ItineraryItem::new("Gym".to_string(), Some("d".repeat(501))).is_err());
}

#[test]
fn test_id_string_round_trip() {
    let habit_id = HabitId::new();
    assert_eq!(
        HabitId::from_string(&habit_id.to_string()).unwrap(),
        habit_id
    );
    assert!(HabitId::from_string("not-a-uuid").is_err());

    let entry_id = EntryId::new();
    assert_eq!(
        EntryId::from_string(&entry_id.to_string()).unwrap(),
        entry_id
    );
}

#[test]
fn test_date_entry_toggle_and_lookup() {
    let habit_id = HabitId::new();
    let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let mut entry = DateEntry::new(date, vec![habit_id.clone()]);

    assert!(!entry.completion_for(&habit_id).unwrap().completed);
    assert!(entry.toggle(&habit_id));
    assert!(entry.completion_for(&habit_id).unwrap().completed);
    assert!(!entry.toggle(&HabitId::new()));
}

#[test]
fn test_slot_parsing() {
    let slot = Slot::from_key("Fri-17:30").unwrap();
    assert_eq!(slot.day, chrono::Weekday::Fri);
    assert_eq!(slot.key(), "Fri-17:30");

    assert!(Slot::from_key("Friday17:30").is_err());
    assert!(Slot::from_key("Nonday-10:00").is_err());
}

#[test]
fn test_schedule_defaults() {
    let schedule = Schedule::default();
    assert_eq!(schedule.interval_minutes, 30);
    assert_eq!(schedule.week_start, chrono::Weekday::Sun);
    assert_eq!(
        schedule.start_time,
        chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    );
    assert!(schedule.slots.is_empty());
}

#[test]
fn test_entry_serialization_round_trip() {
    let habit_id = HabitId::new();
    let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let mut entry = DateEntry::new(date, vec![habit_id.clone()]);
    entry.toggle(&habit_id);

    let json = serde_json::to_string(&entry).unwrap();
    let back: DateEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back, entry);
}
