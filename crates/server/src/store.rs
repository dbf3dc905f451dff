//! In-memory roster backing the activities service.

use std::sync::Arc;

use shared::domain::{ActivityDetails, ActivitySnapshot};
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct ActivityStore {
    activities: Arc<RwLock<ActivitySnapshot>>,
}

impl ActivityStore {
    pub fn new(activities: ActivitySnapshot) -> Self {
        Self {
            activities: Arc::new(RwLock::new(activities)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_activities())
    }

    pub async fn snapshot(&self) -> ActivitySnapshot {
        self.activities.read().await.clone()
    }

    /// Runs `f` against one activity under the write lock.
    pub async fn with_activity<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut ActivityDetails) -> T,
    ) -> Option<T> {
        let mut activities = self.activities.write().await;
        activities.get_mut(name).map(f)
    }
}

fn activity(
    description: &str,
    schedule: &str,
    max_participants: i64,
    participants: &[&str],
) -> ActivityDetails {
    ActivityDetails {
        description: description.to_string(),
        schedule: schedule.to_string(),
        max_participants,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

pub fn seed_activities() -> ActivitySnapshot {
    ActivitySnapshot::from([
        (
            "Chess Club".to_string(),
            activity(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
                &["michael@mergington.edu", "daniel@mergington.edu"],
            ),
        ),
        (
            "Programming Class".to_string(),
            activity(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
                &["emma@mergington.edu", "sophia@mergington.edu"],
            ),
        ),
        (
            "Gym Class".to_string(),
            activity(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
                &["john@mergington.edu", "olivia@mergington.edu"],
            ),
        ),
        (
            "Basketball Team".to_string(),
            activity(
                "Competitive basketball training and games",
                "Wednesdays, 4:00 PM - 6:00 PM",
                15,
                &["alex@mergington.edu"],
            ),
        ),
        (
            "Art Club".to_string(),
            activity(
                "Explore painting, drawing and mixed media",
                "Thursdays, 3:30 PM - 5:00 PM",
                15,
                &[],
            ),
        ),
        (
            "Debate Team".to_string(),
            activity(
                "Develop public speaking and argumentation skills",
                "Tuesdays, 4:00 PM - 5:30 PM",
                2,
                &["mia.jones@mergington.edu", "noah_lee@mergington.edu"],
            ),
        ),
    ])
}
