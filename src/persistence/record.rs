use crate::model::{
    Army, ArmyId, Building, BuildingId, City, CityId, Coord, MapTile, Training, User, UserId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    User,
    MapTile,
    City,
    Building,
    Army,
    Training,
}

/// One persisted row.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    User(User),
    MapTile(MapTile),
    City(City),
    Building(Building),
    Army(Army),
    Training(Training),
}

/// Primary key of a persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    User(UserId),
    MapTile(Coord),
    City(CityId),
    Building(BuildingId),
    Army(ArmyId),
    Training(BuildingId),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::User(_) => RecordKind::User,
            Record::MapTile(_) => RecordKind::MapTile,
            Record::City(_) => RecordKind::City,
            Record::Building(_) => RecordKind::Building,
            Record::Army(_) => RecordKind::Army,
            Record::Training(_) => RecordKind::Training,
        }
    }

    pub fn key(&self) -> RecordKey {
        match self {
            Record::User(u) => RecordKey::User(u.id.clone()),
            Record::MapTile(t) => RecordKey::MapTile(t.coord),
            Record::City(c) => RecordKey::City(c.id.clone()),
            Record::Building(b) => RecordKey::Building(b.id.clone()),
            Record::Army(a) => RecordKey::Army(a.id.clone()),
            Record::Training(t) => RecordKey::Training(t.barracks_id.clone()),
        }
    }
}

impl RecordKey {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordKey::User(_) => RecordKind::User,
            RecordKey::MapTile(_) => RecordKind::MapTile,
            RecordKey::City(_) => RecordKind::City,
            RecordKey::Building(_) => RecordKind::Building,
            RecordKey::Army(_) => RecordKind::Army,
            RecordKey::Training(_) => RecordKind::Training,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::User(id) => write!(f, "user {id}"),
            RecordKey::MapTile(c) => write!(f, "map tile {c}"),
            RecordKey::City(id) => write!(f, "city {id}"),
            RecordKey::Building(id) => write!(f, "building {id}"),
            RecordKey::Army(id) => write!(f, "army {id}"),
            RecordKey::Training(id) => write!(f, "training of {id}"),
        }
    }
}

/// Every persisted row, grouped by kind. This is what bootstrap reads back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldRows {
    pub users: Vec<User>,
    pub map_tiles: Vec<MapTile>,
    pub cities: Vec<City>,
    pub buildings: Vec<Building>,
    pub armies: Vec<Army>,
    pub trainings: Vec<Training>,
}

impl WorldRows {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.map_tiles.is_empty()
            && self.cities.is_empty()
            && self.buildings.is_empty()
            && self.armies.is_empty()
            && self.trainings.is_empty()
    }
}
