use super::{CityId, Coord, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityKind {
    Capital,
    Town,
}

/// A city occupying the `size × size` square of tiles starting at `origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub kind: CityKind,
    pub owner: Option<UserId>,
    pub name: String,
    pub population: f64,
    pub population_cap: f64,
    pub origin: Coord,
    pub size: i32,
}

impl City {
    /// The tile armies deploy to.
    pub fn center(&self) -> Coord {
        Coord::new(self.origin.x + self.size / 2, self.origin.y + self.size / 2)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.origin.x
            && coord.x < self.origin.x + self.size
            && coord.y >= self.origin.y
            && coord.y < self.origin.y + self.size
    }

    pub fn tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |dx| {
            (0..self.size).map(move |dy| Coord::new(self.origin.x + dx, self.origin.y + dy))
        })
    }
}

/// Input of city creation.
#[derive(Debug, Clone)]
pub struct NewCity {
    pub kind: CityKind,
    pub owner: Option<UserId>,
    pub name: String,
    pub size: i32,
    /// Explicit placement. A free square is searched for when `None`.
    pub origin: Option<Coord>,
}

/// One discrete logistic growth step. A city without capacity does not grow.
pub fn logistic_step(population: f64, cap: f64, rate: f64) -> f64 {
    if cap <= 0.0 || population <= 0.0 {
        return population;
    }
    population + rate * population * (1.0 - population / cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(origin: Coord, size: i32) -> City {
        City {
            id: CityId::from("city_1"),
            kind: CityKind::Capital,
            owner: None,
            name: "Ur".into(),
            population: 250.0,
            population_cap: 250.0,
            origin,
            size,
        }
    }

    #[test]
    fn test_city_square_and_center() {
        let c = city(Coord::new(10, 20), 5);
        assert_eq!(c.tiles().count(), 25);
        assert!(c.contains(Coord::new(14, 24)));
        assert!(!c.contains(Coord::new(15, 24)));
        assert_eq!(c.center(), Coord::new(12, 22));
    }

    #[test]
    fn test_growth_is_monotonic_and_bounded() {
        let cap = 1000.0;
        let mut pop = 100.0;
        for _ in 0..200_000 {
            let next = logistic_step(pop, cap, 0.001);
            assert!(next >= pop);
            assert!(next <= cap);
            pop = next;
        }
        assert!(pop > 990.0);
    }

    #[test]
    fn test_growth_above_cap_shrinks_toward_cap() {
        let next = logistic_step(300.0, 250.0, 0.001);
        assert!(next < 300.0 && next > 250.0);
    }

    #[test]
    fn test_no_growth_without_cap() {
        assert_eq!(logistic_step(50.0, 0.0, 0.001), 50.0);
    }
}
