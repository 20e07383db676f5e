use crate::city_actor;
use crate::clients::ActorClient;
use crate::directory::EntityKind;
use crate::error::{OrNotFound, WorldError};
use crate::lifecycle::WorldSystem;
use crate::map_tile_actor;
use crate::model::{City, CityId, CityKind, Coord, MapTile, NewCity, TileView, UserId};
use rand::Rng;
use tracing::{debug, info, instrument};

impl WorldSystem {
    /// Creates an empty tile. Coordinates run from `0` to `map_size - 1` on both axes.
    pub async fn create_map_tile(&self, coord: Coord) -> Result<MapTile, WorldError> {
        let size = self.config().map_size;
        if !(0..size).contains(&coord.x) || !(0..size).contains(&coord.y) {
            return Err(WorldError::Invalid(format!("{coord} is outside the {size}x{size} map")));
        }
        if self.directory().tile(coord).is_some() {
            return Err(WorldError::Invalid(format!("tile {coord} already exists")));
        }
        let tile = MapTile::empty(coord);
        map_tile_actor::start(tile.clone(), self.context(), false).await?;
        Ok(tile)
    }

    /// The tile with its city, building and armies grouped by owner username.
    pub async fn get_map_tile(&self, x: i32, y: i32) -> Result<TileView, WorldError> {
        let coord = Coord::new(x, y);
        self.tile_client(coord)?
            .describe()
            .await
            .or_not_found(EntityKind::MapTile, coord)
    }

    /// Founds a city on a free square of tiles.
    ///
    /// Without an explicit origin a random free square is searched for. A capital starts with
    /// `initial_capital_population`, a town with `initial_town_population`; the cap starts at
    /// the same value and is raised by population buildings.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create_city(&self, new: NewCity) -> Result<City, WorldError> {
        let size = if new.size > 0 {
            new.size
        } else {
            self.config().city_size
        };
        if size > self.config().map_size {
            return Err(WorldError::Invalid(format!("city size {size} exceeds the map")));
        }
        if let Some(owner) = &new.owner {
            self.user_client(owner)?;
        }

        let origin = match new.origin {
            Some(origin) => {
                if !self.fits_on_map(origin, size) {
                    return Err(WorldError::Invalid(format!(
                        "a {size}x{size} city at {origin} leaves the map"
                    )));
                }
                if !self.is_free(origin, size).await? {
                    return Err(WorldError::Invalid(format!(
                        "the {size}x{size} square at {origin} overlaps a city"
                    )));
                }
                origin
            }
            None => self.find_free_origin(size).await?,
        };

        let population = match new.kind {
            CityKind::Capital => self.config().initial_capital_population,
            CityKind::Town => self.config().initial_town_population,
        };
        let city = City {
            id: CityId::generate(),
            kind: new.kind,
            owner: new.owner,
            name: new.name,
            population,
            population_cap: population,
            origin,
            size,
        };
        city_actor::start(city.clone(), self.context(), false).await?;
        info!(id = %city.id, %origin, "City founded");
        Ok(city)
    }

    pub async fn get_city(&self, id: &CityId) -> Result<City, WorldError> {
        self.city_client(id)?
            .get()
            .await
            .or_not_found(EntityKind::City, id)
    }

    /// Hands a city to another user, or makes it neutral with `None`.
    ///
    /// Buildings of the city are told to drop their cached owner, so production follows the
    /// new owner from the next tick on.
    #[instrument(skip(self))]
    pub async fn set_city_owner(
        &self,
        id: &CityId,
        owner: Option<UserId>,
    ) -> Result<(), WorldError> {
        if let Some(owner) = &owner {
            self.user_client(owner)?;
        }
        self.city_client(id)?
            .set_owner(owner)
            .await
            .or_not_found(EntityKind::City, id)
    }

    /// Destroys a city together with every building standing inside it.
    #[instrument(skip(self))]
    pub async fn delete_city(&self, id: &CityId) -> Result<(), WorldError> {
        let client = self.city_client(id)?;
        let city = client.get().await.or_not_found(EntityKind::City, id)?;

        for coord in city.tiles() {
            let Some(tile) = self.directory().tile(coord) else {
                continue;
            };
            let occupancy = tile
                .occupancy()
                .await
                .or_not_found(EntityKind::MapTile, coord)?;
            if let Some(building) = occupancy.building_id {
                match self.demolish_building(&building).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_found() => debug!(%building, "Building already gone"),
                    Err(e) => return Err(e),
                }
            }
        }

        client.delete().await.or_not_found(EntityKind::City, id)?;
        Ok(())
    }

    fn fits_on_map(&self, origin: Coord, size: i32) -> bool {
        let map = self.config().map_size;
        origin.x >= 0 && origin.y >= 0 && origin.x + size <= map && origin.y + size <= map
    }

    /// True when no existing tile of the square belongs to a city.
    async fn is_free(&self, origin: Coord, size: i32) -> Result<bool, WorldError> {
        for dx in 0..size {
            for dy in 0..size {
                let coord = Coord::new(origin.x + dx, origin.y + dy);
                let Some(tile) = self.directory().tile(coord) else {
                    continue;
                };
                let occupancy = tile
                    .occupancy()
                    .await
                    .or_not_found(EntityKind::MapTile, coord)?;
                if occupancy.city_id.is_some() {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    async fn find_free_origin(&self, size: i32) -> Result<Coord, WorldError> {
        let attempts = self.config().placement_attempts;
        let max = self.config().map_size - size;
        for attempt in 0..attempts {
            let origin = random_origin(max);
            if self.is_free(origin, size).await? {
                debug!(%origin, attempt, "Free square found");
                return Ok(origin);
            }
        }
        Err(WorldError::NoFreeArea { size, attempts })
    }
}

fn random_origin(max: i32) -> Coord {
    let mut rng = rand::thread_rng();
    Coord::new(rng.gen_range(0..=max), rng.gen_range(0..=max))
}
