use super::{Car, CarId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Every car currently on the map.
///
/// Cars are inserted fully constructed, so a snapshot never holds a car
/// without its position. Snapshots are copies taken under the lock.
#[derive(Debug, Default)]
pub struct CarManager {
    cars: Mutex<Vec<Arc<Car>>>,
}

impl CarManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, car: Arc<Car>) {
        self.cars.lock().push(car);
    }

    pub fn remove(&self, id: CarId) -> Option<Arc<Car>> {
        let mut cars = self.cars.lock();
        let pos = cars.iter().position(|c| c.id() == id)?;
        Some(cars.remove(pos))
    }

    pub fn snapshot(&self) -> Vec<Arc<Car>> {
        self.cars.lock().clone()
    }

    pub fn contains(&self, id: CarId) -> bool {
        self.cars.lock().iter().any(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.cars.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::SpriteHandle;
    use crate::simulation::{Point, Rect};

    fn car(id: usize) -> Arc<Car> {
        let area = Rect::from_origin(Point::new(445.0, -20.0), 20.0, 20.0);
        Arc::new(Car::new(CarId(id), area, SpriteHandle(id as u64)))
    }

    #[test]
    fn add_then_remove() {
        let registry = CarManager::new();
        registry.add(car(1));
        registry.add(car(2));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(CarId(1)));

        let removed = registry.remove(CarId(1)).unwrap();
        assert_eq!(removed.id(), CarId(1));
        assert!(!registry.contains(CarId(1)));
        assert!(registry.remove(CarId(1)).is_none());
    }

    #[test]
    fn snapshot_is_detached_from_later_changes() {
        let registry = CarManager::new();
        registry.add(car(1));
        let snapshot = registry.snapshot();
        registry.remove(CarId(1));
        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }
}
