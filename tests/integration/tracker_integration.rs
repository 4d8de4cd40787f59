/// Storage-backed tracker flows
use habitron::*;
use tempfile::tempdir;

async fn server_in(dir: &tempfile::TempDir) -> HabitronServer {
    HabitronServer::new(dir.path().join("tracker.db"))
        .await
        .expect("Failed to create server")
}

#[tokio::test]
async fn test_server_creation_and_reopen() {
    let dir = tempdir().unwrap();

    {
        let server = server_in(&dir).await;
        create_habit(
            server.storage(),
            CreateHabitParams {
                name: "Stretch".to_string(),
                icon: None,
            },
        )
        .unwrap();
    }

    // Reopening the same database must find the habit again.
    let server = server_in(&dir).await;
    let listed = list_habits(server.storage()).unwrap();
    assert_eq!(listed.habits.len(), 1);
    assert_eq!(listed.habits[0].name, "Stretch");
}

#[tokio::test]
async fn test_full_tracking_workflow() {
    let dir = tempdir().unwrap();
    let server = server_in(&dir).await;
    let storage = server.storage();

    // Two habits, three tracked days.
    let run = create_habit(
        storage,
        CreateHabitParams {
            name: "Run".to_string(),
            icon: Some("🏃".to_string()),
        },
    )
    .unwrap();
    let read = create_habit(
        storage,
        CreateHabitParams {
            name: "Read".to_string(),
            icon: Some("📚".to_string()),
        },
    )
    .unwrap();

    let mut entry_ids = Vec::new();
    for date in ["2025-01-01", "2025-01-02", "2025-01-03"] {
        let added = add_log_date(
            storage,
            AddDateParams {
                date: Some(date.to_string()),
            },
        )
        .unwrap();
        entry_ids.push(added.entry_id);
    }

    // Complete both habits on days 1 and 3, only one on day 2.
    for (entry_id, habit_ids) in [
        (&entry_ids[0], vec![&run.habit_id, &read.habit_id]),
        (&entry_ids[1], vec![&run.habit_id]),
        (&entry_ids[2], vec![&run.habit_id, &read.habit_id]),
    ] {
        for habit_id in habit_ids {
            toggle_completion(
                storage,
                ToggleCompletionParams {
                    entry_id: entry_id.clone(),
                    habit_id: habit_id.clone(),
                },
            )
            .unwrap();
        }
    }

    let log = fetch_log(storage).unwrap();
    let streaks: Vec<u32> = log.entries.iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 0, 1]);

    let status = get_status(storage).unwrap();
    assert_eq!(status.summary.current_streak, 1);
    assert_eq!(status.summary.longest_streak, 1);
    assert_eq!(status.summary.completed_days, 2);

    // Run was completed every day, Read on two of three.
    let chart = completion_chart(storage).unwrap();
    let run_rate = chart.rates.iter().find(|r| r.name == "Run").unwrap();
    let read_rate = chart.rates.iter().find(|r| r.name == "Read").unwrap();
    assert_eq!(run_rate.completion_percent, 100);
    assert_eq!(read_rate.completion_percent, 67);
}

#[tokio::test]
async fn test_deleting_habit_rewrites_log() {
    let dir = tempdir().unwrap();
    let server = server_in(&dir).await;
    let storage = server.storage();

    let run = create_habit(
        storage,
        CreateHabitParams {
            name: "Run".to_string(),
            icon: None,
        },
    )
    .unwrap();
    let read = create_habit(
        storage,
        CreateHabitParams {
            name: "Read".to_string(),
            icon: None,
        },
    )
    .unwrap();

    let added = add_log_date(
        storage,
        AddDateParams {
            date: Some("2025-01-01".to_string()),
        },
    )
    .unwrap();

    // Only Run gets completed; the day is not fully done.
    toggle_completion(
        storage,
        ToggleCompletionParams {
            entry_id: added.entry_id,
            habit_id: run.habit_id.clone(),
        },
    )
    .unwrap();
    assert_eq!(get_status(storage).unwrap().summary.completed_days, 0);

    // Dropping Read leaves a day where everything remaining is done.
    let deleted = delete_habit(
        storage,
        DeleteHabitParams {
            habit_id: read.habit_id,
        },
    )
    .unwrap();
    assert_eq!(deleted.entries_updated, 1);

    let log = fetch_log(storage).unwrap();
    assert!(log.entries[0].all_completed);
    assert_eq!(log.entries[0].streak_days, 1);
    assert_eq!(log.entries[0].completions.len(), 1);
}

#[tokio::test]
async fn test_edit_and_delete_entries() {
    let dir = tempdir().unwrap();
    let server = server_in(&dir).await;
    let storage = server.storage();

    let habit = create_habit(
        storage,
        CreateHabitParams {
            name: "Run".to_string(),
            icon: None,
        },
    )
    .unwrap();

    let mut entry_ids = Vec::new();
    for date in ["2025-02-01", "2025-02-02", "2025-02-05"] {
        let added = add_log_date(
            storage,
            AddDateParams {
                date: Some(date.to_string()),
            },
        )
        .unwrap();
        toggle_completion(
            storage,
            ToggleCompletionParams {
                entry_id: added.entry_id.clone(),
                habit_id: habit.habit_id.clone(),
            },
        )
        .unwrap();
        entry_ids.push(added.entry_id);
    }

    // Moving the stray day next to the chain extends it to three.
    let moved = edit_log_date(
        storage,
        EditDateParams {
            entry_id: entry_ids[2].clone(),
            date: "2025-02-03".to_string(),
        },
    )
    .unwrap();
    let streaks: Vec<u32> = moved.entries.iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 2, 3]);

    // Moving onto an occupied date must fail.
    let collision = edit_log_date(
        storage,
        EditDateParams {
            entry_id: entry_ids[2].clone(),
            date: "2025-02-01".to_string(),
        },
    );
    assert!(collision.is_err());

    // Deleting the middle day splits the chain.
    let remaining = delete_log_entry(
        storage,
        DeleteEntryParams {
            entry_id: entry_ids[1].clone(),
        },
    )
    .unwrap();
    let streaks: Vec<u32> = remaining.entries.iter().map(|e| e.streak_days).collect();
    assert_eq!(streaks, vec![1, 1]);
}

#[tokio::test]
async fn test_itinerary_and_schedule_flow() {
    let dir = tempdir().unwrap();
    let server = server_in(&dir).await;
    let storage = server.storage();

    let gym = add_itinerary_item(
        storage,
        AddItemParams {
            name: "Gym".to_string(),
            description: Some("Strength training".to_string()),
        },
    )
    .unwrap();

    assign_schedule_slot(
        storage,
        AssignSlotParams {
            slot: "Mon-18:00".to_string(),
            item_id: gym.item_id.clone(),
        },
    )
    .unwrap();
    assign_schedule_slot(
        storage,
        AssignSlotParams {
            slot: "Thu-18:00".to_string(),
            item_id: gym.item_id.clone(),
        },
    )
    .unwrap();

    configure_schedule(
        storage,
        ConfigureScheduleParams {
            start_time: Some("06:30".to_string()),
            interval_minutes: Some(60),
            week_start: Some("Mon".to_string()),
        },
    )
    .unwrap();

    let view = view_schedule(storage).unwrap();
    assert_eq!(view.assignments.len(), 2);
    assert_eq!(view.start_time, "06:30");
    assert_eq!(view.interval_minutes, 60);
    assert_eq!(view.week_start, "Mon");

    // Settings and assignments survive a reopen.
    drop(view);
    let server = server_in(&dir).await;
    let view = view_schedule(server.storage()).unwrap();
    assert_eq!(view.assignments.len(), 2);
    assert_eq!(view.assignments[0].item_name, "Gym");

    // Removing the item empties its slots.
    remove_itinerary_item(
        server.storage(),
        RemoveItemParams {
            item_id: gym.item_id,
        },
    )
    .unwrap();
    assert!(view_schedule(server.storage()).unwrap().assignments.is_empty());
}

#[tokio::test]
async fn test_storage_trait_object() {
    let dir = tempdir().unwrap();
    let server = server_in(&dir).await;

    // SqliteStorage is usable through the trait interface.
    let _: &dyn TrackerStorage = server.storage();
    let _ = server.analytics();
}
