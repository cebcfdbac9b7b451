use crate::error::{GraphError, Result};
use crate::graph::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{debug, info, instrument, warn};

pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

/// Outcome of a random population run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Friendships created (each one is two directed edges)
    pub friendships: usize,
    /// Sampled pairs that were rejected
    pub collisions: usize,
    /// Total pairs sampled
    pub attempts: usize,
}

/// Shortest friendship paths from one user to everyone in their extended network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPaths {
    pub paths: BTreeMap<UserId, Vec<UserId>>,
    /// Mean number of users per path, the source's own `[source]` included
    pub average_length: f64,
}

impl SocialPaths {
    /// Fraction of the other `total_users - 1` users that were reached
    pub fn network_coverage(&self, total_users: usize) -> f64 {
        if total_users <= 1 {
            return 0.0;
        }
        let others_reached = self.paths.len().saturating_sub(1);
        others_reached as f64 / (total_users - 1) as f64
    }

    /// Largest number of friendship hops to any reached user
    pub fn max_degree_of_separation(&self) -> usize {
        self.paths
            .values()
            .map(|path| path.len().saturating_sub(1))
            .max()
            .unwrap_or(0)
    }
}

/// Users and the symmetric friendship relation between them
#[derive(Default)]
pub struct SocialGraph {
    last_id: UserId,
    users: HashMap<UserId, User>,
    friendships: Graph<UserId>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new user with the next sequential id, starting at 1
    pub fn add_user(&mut self, name: impl Into<String>) -> UserId {
        self.last_id += 1;
        self.users.insert(self.last_id, User { name: name.into() });
        self.friendships.add_vertex(self.last_id);
        self.last_id
    }

    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of friendships (each counted once)
    pub fn friendship_count(&self) -> usize {
        self.friendships.edge_count() / 2
    }

    /// Friends of a user in the order the friendships were made
    pub fn friends_of(&self, user_id: UserId) -> Result<Vec<UserId>> {
        self.friendships.neighbors(&user_id)
    }

    pub fn are_friends(&self, user_id: UserId, friend_id: UserId) -> bool {
        self.friendships.contains_edge(&user_id, &friend_id)
    }

    /// Create a bi-directional friendship.
    ///
    /// Self friendship and repeated friendship are logged and rejected with
    /// `Ok(false)`. Unknown users are an error.
    pub fn add_friendship(&mut self, user_id: UserId, friend_id: UserId) -> Result<bool> {
        self.friendships.ensure_vertex(&user_id)?;
        self.friendships.ensure_vertex(&friend_id)?;

        if user_id == friend_id {
            warn!("User {} cannot be friends with themselves", user_id);
            return Ok(false);
        }

        if self.are_friends(user_id, friend_id) || self.are_friends(friend_id, user_id) {
            warn!("Friendship between {} and {} already exists", user_id, friend_id);
            return Ok(false);
        }

        self.friendships.add_edge(&user_id, &friend_id);
        self.friendships.add_edge(&friend_id, &user_id);
        Ok(true)
    }

    /// Default sampling cap for a population target
    pub fn default_max_attempts(target_edges: usize) -> usize {
        target_edges.saturating_mul(100).saturating_add(1000)
    }

    /// Replace the graph with `num_users` users and random friendships until
    /// the average user has `avg_friendships` friends.
    ///
    /// Rejected pairs are counted as collisions and resampled, at most
    /// `max_attempts` times in total. The new network is built aside and only
    /// swapped in on success; on error the existing network is unchanged.
    #[instrument(skip(self, rng))]
    pub fn populate<R: Rng>(
        &mut self,
        num_users: usize,
        avg_friendships: usize,
        max_attempts: Option<usize>,
        rng: &mut R,
    ) -> Result<PopulationStats> {
        if avg_friendships > 0 && avg_friendships >= num_users {
            return Err(GraphError::invalid_configuration(format!(
                "average friendships ({}) must be smaller than the number of users ({})",
                avg_friendships, num_users
            )));
        }

        let target = num_users * avg_friendships;
        let max_attempts = max_attempts.unwrap_or_else(|| Self::default_max_attempts(target));

        let mut fresh = Self::new();
        for i in 0..num_users {
            fresh.add_user(format!("User {}", i + 1));
        }

        let mut placed = 0;
        let mut stats = PopulationStats {
            friendships: 0,
            collisions: 0,
            attempts: 0,
        };

        while placed < target {
            if stats.attempts >= max_attempts {
                return Err(GraphError::RetryLimitExceeded {
                    attempts: stats.attempts,
                    reached: placed,
                    target,
                });
            }
            stats.attempts += 1;

            let user_id = rng.gen_range(1..=fresh.last_id);
            let friend_id = rng.gen_range(1..=fresh.last_id);

            if fresh.try_befriend(user_id, friend_id) {
                placed += 2;
                stats.friendships += 1;
            } else {
                stats.collisions += 1;
            }
        }

        *self = fresh;

        info!(
            "Populated {} users with {} friendships ({} collisions)",
            num_users, stats.friendships, stats.collisions
        );
        Ok(stats)
    }

    /// Same as [`SocialGraph::populate`], seeding the generator when a seed is given
    pub fn populate_seeded(
        &mut self,
        num_users: usize,
        avg_friendships: usize,
        max_attempts: Option<usize>,
        seed: Option<u64>,
    ) -> Result<PopulationStats> {
        match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.populate(num_users, avg_friendships, max_attempts, &mut rng)
            }
            None => self.populate(num_users, avg_friendships, max_attempts, &mut rand::thread_rng()),
        }
    }

    // Sampled rejections count as collisions and are not logged
    fn try_befriend(&mut self, user_id: UserId, friend_id: UserId) -> bool {
        if user_id == friend_id || self.are_friends(user_id, friend_id) {
            return false;
        }
        self.friendships.add_edge(&user_id, &friend_id);
        self.friendships.add_edge(&friend_id, &user_id);
        true
    }

    /// Shortest friendship path from `user_id` to every user in their
    /// extended network, keyed by the reached user.
    #[instrument(skip(self))]
    pub fn get_all_social_paths(&self, user_id: UserId) -> Result<SocialPaths> {
        self.friendships.ensure_vertex(&user_id)?;

        let mut visited: BTreeMap<UserId, Vec<UserId>> = BTreeMap::new();
        let mut queue = VecDeque::new();

        queue.push_back(vec![user_id]);

        while let Some(path) = queue.pop_front() {
            let user = match path.last() {
                Some(&user) => user,
                None => continue,
            };

            if visited.contains_key(&user) {
                continue;
            }

            for friend in self.friendships.neighbors(&user)? {
                let mut connections = path.clone();
                connections.push(friend);
                queue.push_back(connections);
            }
            visited.insert(user, path);
        }

        let total_length: usize = visited.values().map(Vec::len).sum();
        let average_length = total_length as f64 / visited.len() as f64;

        debug!(
            "User {} reaches {} users, average path length {:.2}",
            user_id,
            visited.len(),
            average_length
        );

        Ok(SocialPaths {
            paths: visited,
            average_length,
        })
    }
}
