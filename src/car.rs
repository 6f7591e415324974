use crate::assets::AssetStore;
use crate::model::Mesh;
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{error, info};

/// Number of spec lines shown for every car
pub const SPEC_LINES: usize = 6;

/// Catalog entry describing one car
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CarPars {
    pub name: String,
    /// `rom:/` uri of the car model
    pub model_path: String,
    /// Body color the model is drawn with
    pub paint: [u8; 3],
    pub specs: [String; SPEC_LINES],
}

/// The list of cars on show
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    pub cars: Vec<CarPars>,
}

fn car(name: &str, model_path: &str, paint: [u8; 3], specs: [&str; SPEC_LINES]) -> CarPars {
    CarPars {
        name: name.to_string(),
        model_path: model_path.to_string(),
        paint,
        specs: specs.map(str::to_string),
    }
}

impl Catalog {
    /// The three cars of the first showcase
    pub fn first_revision() -> Self {
        Catalog {
            cars: vec![
                car(
                    "Ferrari F40",
                    "rom:/f40.obj",
                    [200, 16, 24],
                    [
                        "Engine: 2.9L Twin-Turbo V8",
                        "Power: 471 HP @ 7000 RPM",
                        "Torque: 577 Nm @ 4000 RPM",
                        "Weight: 1100 kg",
                        "Top Speed: 324 km/h",
                        "0-100: 4.1 seconds",
                    ],
                ),
                car(
                    "Mercedes CLK GTR",
                    "rom:/clk.obj",
                    [192, 196, 204],
                    [
                        "Engine: 6.9L Naturally Aspirated V12",
                        "Power: 612 HP @ 6800 RPM",
                        "Torque: 731 Nm @ 5250 RPM",
                        "Weight: 1440 kg",
                        "Top Speed: 320 km/h",
                        "0-100: 3.8 seconds",
                    ],
                ),
                car(
                    "BMW M1",
                    "rom:/m1.obj",
                    [236, 236, 228],
                    [
                        "Engine: 3.5L Naturally Aspirated I6",
                        "Power: 277 HP @ 6500 RPM",
                        "Torque: 330 Nm @ 5000 RPM",
                        "Weight: 1300 kg",
                        "Top Speed: 262 km/h",
                        "0-100: 5.6 seconds",
                    ],
                ),
            ],
        }
    }

    /// The current four-car lineup
    pub fn builtin() -> Self {
        let mut catalog = Catalog::first_revision();
        catalog.cars.push(car(
            "Porsche 911 GT1",
            "rom:/gt1.obj",
            [240, 240, 240],
            [
                "Engine: 3.2L Twin-Turbo Flat-6",
                "Power: 537 HP @ 7000 RPM",
                "Torque: 600 Nm @ 4250 RPM",
                "Weight: 1120 kg",
                "Top Speed: 310 km/h",
                "0-100: 3.7 seconds",
            ],
        ));
        catalog
    }

    /// Reads a JSON catalog file
    pub fn from_file(filepath: &Path) -> anyhow::Result<Self> {
        let fh = OpenOptions::new()
            .read(true)
            .open(filepath)
            .with_context(|| format!("Failed to open catalog file {}!", filepath.display()))?;
        let catalog: Catalog = serde_json::from_reader(&fh)
            .with_context(|| format!("Failed to parse catalog file {}!", filepath.display()))?;
        ensure!(
            !catalog.cars.is_empty(),
            "Catalog file {} lists no cars!",
            filepath.display()
        );
        Ok(catalog)
    }
}

fn load_model(store: &AssetStore, uri: &str) -> anyhow::Result<Mesh> {
    let path = store.resolve(uri)?;
    Ok(Mesh::load(&path)?)
}

/// A catalog car together with its loaded model
#[derive(Debug)]
pub struct Car {
    pub pars: CarPars,
    /// `None` when the model failed to load; the car is then not drawn
    pub model: Option<Mesh>,
}

/// Owns every car and its model for the lifetime of the showcase
#[derive(Debug, Default)]
pub struct Garage {
    cars: Vec<Car>,
}

impl Garage {
    /// Loads every catalog model up front. Failures are logged and leave the
    /// car without a model.
    pub fn load(catalog: Catalog, store: &AssetStore) -> Self {
        let cars = catalog
            .cars
            .into_iter()
            .map(|pars| {
                let model = match load_model(store, &pars.model_path) {
                    Ok(mesh) => {
                        info!(
                            "Successfully loaded model {} ({} triangles)",
                            pars.model_path,
                            mesh.triangles.len()
                        );
                        Some(mesh)
                    }
                    Err(err) => {
                        error!("Failed to load model {}: {:#}", pars.model_path, err);
                        None
                    }
                };
                Car { pars, model }
            })
            .collect();
        Garage { cars }
    }

    #[cfg(test)]
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn get(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    /// Frees every loaded model, returning how many were released
    pub fn release(&mut self) -> usize {
        let released = self
            .cars
            .iter_mut()
            .filter_map(|car| car.model.take())
            .count();
        info!("Released {} car models", released);
        released
    }
}
