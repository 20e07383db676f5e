use crate::clients::ActorClient;
use crate::directory::EntityKind;
use crate::error::{OrNotFound, WorldError};
use crate::lifecycle::WorldSystem;
use crate::model::{CityKind, NewUser, User, UserId};
use crate::password::hash_password;
use crate::user_actor;
use tokio::task;
use tracing::{debug, info, instrument, warn};

impl WorldSystem {
    /// Registers a player with the configured starting gold and food.
    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn register_user(&self, new: NewUser) -> Result<UserId, WorldError> {
        if new.email.trim().is_empty() || new.username.trim().is_empty() {
            return Err(WorldError::Invalid("email and username are required".into()));
        }
        if new.password.is_empty() {
            return Err(WorldError::Invalid("password is required".into()));
        }

        let (password, cost) = (new.password, self.config().password_cost);
        let password_hash = task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| WorldError::Internal(format!("password hashing task: {e}")))??;

        let user = User {
            id: UserId::generate(),
            email: new.email,
            username: new.username,
            password_hash,
            gold: self.config().initial_gold,
            food: self.config().initial_food,
            allies: Vec::new(),
        };
        let id = user.id.clone();
        user_actor::start(user, self.context(), false).await?;
        info!(%id, "User registered");
        Ok(id)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User, WorldError> {
        self.user_client(id)?
            .get()
            .await
            .or_not_found(EntityKind::User, id)
    }

    /// Applies signed deltas to gold and food. Returns the new `(gold, food)` balances.
    pub async fn adjust_resources(
        &self,
        id: &UserId,
        gold: i64,
        food: i64,
    ) -> Result<(i64, i64), WorldError> {
        let user = self.user_client(id)?;
        let gold = user
            .adjust_gold(gold)
            .await
            .or_not_found(EntityKind::User, id)?;
        let food = user
            .adjust_food(food)
            .await
            .or_not_found(EntityKind::User, id)?;
        Ok((gold, food))
    }

    /// Makes two users allies of each other.
    pub async fn add_alliance(&self, a: &UserId, b: &UserId) -> Result<(), WorldError> {
        if a == b {
            return Err(WorldError::Invalid(format!("{a} cannot ally with itself")));
        }
        let (left, right) = (self.user_client(a)?, self.user_client(b)?);
        left.add_ally(b.clone())
            .await
            .or_not_found(EntityKind::User, a)?;
        right
            .add_ally(a.clone())
            .await
            .or_not_found(EntityKind::User, b)?;
        Ok(())
    }

    /// Ends an alliance on both sides. Returns whether either side had it.
    pub async fn remove_alliance(&self, a: &UserId, b: &UserId) -> Result<bool, WorldError> {
        let (left, right) = (self.user_client(a)?, self.user_client(b)?);
        let removed_left = left
            .remove_ally(b.clone())
            .await
            .or_not_found(EntityKind::User, a)?;
        let removed_right = right
            .remove_ally(a.clone())
            .await
            .or_not_found(EntityKind::User, b)?;
        Ok(removed_left || removed_right)
    }

    /// Removes an account and everything hanging off it.
    ///
    /// Armies are disbanded and capitals destroyed first; towns fall back to neutral. The
    /// user is then dropped from every ally's list and deleted.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), WorldError> {
        let user = self.user_client(id)?;
        let snapshot = user.get().await.or_not_found(EntityKind::User, id)?;
        let holdings = user.holdings().await.or_not_found(EntityKind::User, id)?;

        for army in &holdings.armies {
            match self.disband_army(army).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => debug!(%army, "Army already gone"),
                Err(e) => return Err(e),
            }
        }

        for city_id in &holdings.cities {
            let city = match self.get_city(city_id).await {
                Ok(city) => city,
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e),
            };
            match city.kind {
                CityKind::Capital => self.delete_city(city_id).await?,
                CityKind::Town => {
                    self.city_client(city_id)?
                        .set_owner(None)
                        .await
                        .or_not_found(EntityKind::City, city_id)?;
                }
            }
        }

        for ally in &snapshot.allies {
            if let Some(other) = self.directory().user(ally) {
                if let Err(e) = other.remove_ally(id.clone()).await {
                    warn!(%ally, error = %e, "Ally list not updated");
                }
            }
        }

        user.delete().await.or_not_found(EntityKind::User, id)?;
        info!(%id, armies = holdings.armies.len(), cities = holdings.cities.len(), "User deleted");
        Ok(())
    }
}
