use super::{BuildingId, CityId, Coord};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

pub const MAX_BUILDING_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    CityCenter,
    TownCenter,
    Barracks,
    House,
    Farm,
    Mine,
}

// Per-level tables, index = level - 1.
const CENTER_PRODUCTION: [u32; 10] = [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];
const BARRACKS_PRODUCTION: [u32; 10] = [50, 100, 150, 200, 250, 300, 350, 400, 450, 500];
const FARM_PRODUCTION: [u32; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];
const MINE_PRODUCTION: [u32; 10] = [30, 60, 90, 120, 150, 180, 210, 240, 270, 300];

const CITY_CENTER_POPULATION: [u32; 10] =
    [1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, 10000];
const TOWN_CENTER_POPULATION: [u32; 10] = [1000, 200, 300, 400, 500, 600, 700, 800, 900, 10000];
const HOUSE_POPULATION: [u32; 10] = [250, 500, 750, 1000, 1250, 1500, 1750, 2000, 2250, 2500];

const CITY_CENTER_COST: [u32; 10] = [1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000, 9000, 10000];
const TOWN_CENTER_COST: [u32; 10] = [1000, 200, 300, 400, 500, 600, 700, 800, 900, 10000];
const BARRACKS_COST: [u32; 10] = [500, 1000, 1500, 2000, 2500, 3000, 3500, 4000, 4500, 5000];
const HOUSE_COST: [u32; 10] = [200, 400, 600, 800, 1000, 1200, 1400, 1600, 1800, 2000];
const FARM_COST: [u32; 10] = [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];
const MINE_COST: [u32; 10] = [300, 600, 900, 1200, 1500, 1800, 2100, 2400, 2700, 3000];

const CENTER_CONSTRUCTION_SECS: [u64; 10] = [0, 20, 30, 40, 50, 60, 70, 80, 90, 100];
const BARRACKS_CONSTRUCTION_SECS: [u64; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];
const SMALL_CONSTRUCTION_SECS: [u64; 10] = [5, 10, 15, 20, 25, 30, 35, 40, 45, 50];

fn at<T: Copy + Default>(table: &[T; 10], level: u32) -> T {
    match level {
        1..=MAX_BUILDING_LEVEL => table[(level - 1) as usize],
        _ => T::default(),
    }
}

impl BuildingKind {
    /// Resources produced per production tick. Zero for kinds that produce nothing.
    pub fn production(self, level: u32) -> u32 {
        match self {
            BuildingKind::CityCenter | BuildingKind::TownCenter => at(&CENTER_PRODUCTION, level),
            BuildingKind::Barracks => at(&BARRACKS_PRODUCTION, level),
            BuildingKind::Farm => at(&FARM_PRODUCTION, level),
            BuildingKind::Mine => at(&MINE_PRODUCTION, level),
            BuildingKind::House => 0,
        }
    }

    /// Population capacity the building adds to its city.
    pub fn population(self, level: u32) -> u32 {
        match self {
            BuildingKind::CityCenter => at(&CITY_CENTER_POPULATION, level),
            BuildingKind::TownCenter => at(&TOWN_CENTER_POPULATION, level),
            BuildingKind::House => at(&HOUSE_POPULATION, level),
            _ => 0,
        }
    }

    pub fn cost(self, level: u32) -> u32 {
        match self {
            BuildingKind::CityCenter => at(&CITY_CENTER_COST, level),
            BuildingKind::TownCenter => at(&TOWN_CENTER_COST, level),
            BuildingKind::Barracks => at(&BARRACKS_COST, level),
            BuildingKind::House => at(&HOUSE_COST, level),
            BuildingKind::Farm => at(&FARM_COST, level),
            BuildingKind::Mine => at(&MINE_COST, level),
        }
    }

    pub fn construction_time(self, level: u32) -> Duration {
        let secs = match self {
            BuildingKind::CityCenter | BuildingKind::TownCenter => {
                at(&CENTER_CONSTRUCTION_SECS, level)
            }
            BuildingKind::Barracks => at(&BARRACKS_CONSTRUCTION_SECS, level),
            BuildingKind::House | BuildingKind::Farm | BuildingKind::Mine => {
                at(&SMALL_CONSTRUCTION_SECS, level)
            }
        };
        Duration::from_secs(secs)
    }

    pub fn adds_population(self) -> bool {
        matches!(
            self,
            BuildingKind::CityCenter | BuildingKind::TownCenter | BuildingKind::House
        )
    }

    /// Kinds with a recurring production tick.
    pub fn produces(self) -> bool {
        matches!(
            self,
            BuildingKind::CityCenter | BuildingKind::TownCenter | BuildingKind::Farm | BuildingKind::Mine
        )
    }

    /// City and town centers also yield food.
    pub fn produces_food(self) -> bool {
        matches!(self, BuildingKind::CityCenter | BuildingKind::TownCenter)
    }
}

/// A building placed on one tile of a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub city_id: CityId,
    pub kind: BuildingKind,
    pub level: u32,
    pub coord: Coord,
    pub construction_end: SystemTime,
}

impl Building {
    pub fn is_constructed(&self, now: SystemTime) -> bool {
        self.construction_end <= now
    }
}

/// Input of building construction.
#[derive(Debug, Clone)]
pub struct NewBuilding {
    pub city_id: CityId,
    pub kind: BuildingKind,
    pub coord: Coord,
}
