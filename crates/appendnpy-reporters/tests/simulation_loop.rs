#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Reporters driven by a toy simulation loop

use appendnpy_reporters::{
    ForceReporter, Frame, PositionReporter, PotentialEnergyReporter, ReportError, ReportRequest,
    Reporter, ReporterConfig,
};
use appendnpy_store::{StoreConfig, StoreError, read_array};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn config(path: &Path, interval: u64) -> ReporterConfig {
    ReporterConfig::new(path, interval)
        .unwrap()
        .with_store_config(StoreConfig::new().with_sync_on_append(false))
}

fn frame(step: u64) -> Frame {
    let s = step as f64;
    Frame {
        positions: Some(vec![[0.1 * s, 0.2, 0.3], [1.0, 1.1, 1.2]]),
        forces: Some(vec![[41.84, 0.0, -41.84], [s, 0.0, 0.0]]),
        potential_energy: Some(-4.184 * s),
    }
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{a} != {e}");
    }
}

/// Steps the host forward, reporting whenever a reporter asked for it
fn run(reporters: &mut [&mut dyn Reporter], total_steps: u64) {
    let mut step = 0;
    while step < total_steps {
        let next = reporters
            .iter()
            .map(|r| r.describe_next_report(step).steps)
            .min()
            .unwrap();
        step += next;
        if step > total_steps {
            break;
        }
        let state = frame(step);
        for reporter in reporters.iter_mut() {
            if step % reporter.describe_next_report(0).steps == 0 {
                reporter.report(&state).unwrap();
            }
        }
    }
}

#[test]
fn test_requests_match_quantities() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x.npy");

    let forces = ForceReporter::new(config(&path, 10));
    let positions = PositionReporter::new(config(&path, 10));
    let energy = PotentialEnergyReporter::new(config(&path, 10));

    assert_eq!(
        forces.describe_next_report(3),
        ReportRequest {
            steps: 7,
            positions: false,
            velocities: false,
            forces: true,
            energy: false,
            wrap_positions: None,
        }
    );
    let request = positions.describe_next_report(10);
    assert_eq!(request.steps, 10);
    assert!(request.positions && !request.forces && !request.energy);
    let request = energy.describe_next_report(19);
    assert_eq!(request.steps, 1);
    assert!(request.energy && !request.positions && !request.velocities);
}

#[test]
fn test_loop_writes_every_report() {
    let dir = TempDir::new().unwrap();
    let forces_path = dir.path().join("forces.npy");
    let positions_path = dir.path().join("positions.npy");
    let energy_path = dir.path().join("energy.npy");

    let mut forces = ForceReporter::new(config(&forces_path, 5));
    let mut positions = PositionReporter::new(config(&positions_path, 10));
    let mut energy = PotentialEnergyReporter::new(config(&energy_path, 5));
    let mut reporters: [&mut dyn Reporter; 3] = [&mut forces, &mut positions, &mut energy];
    run(&mut reporters, 20);

    // Forces and energy at steps 5, 10, 15, 20; positions at 10, 20
    let f = read_array::<f64>(&forces_path).unwrap();
    assert_eq!(f.shape(), &[8, 3]);
    assert_close(&f.data()[..6], &[1.0, 0.0, -1.0, 5.0 / 41.84, 0.0, 0.0]);

    let p = read_array::<f64>(&positions_path).unwrap();
    assert_eq!(p.shape(), &[4, 3]);
    assert_close(&p.data()[..3], &[10.0, 2.0, 3.0]);

    let e = read_array::<f64>(&energy_path).unwrap();
    assert_eq!(e.shape(), &[4]);
    assert_close(e.data(), &[-5.0, -10.0, -15.0, -20.0]);
}

#[test]
fn test_reports_continue_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("energy.npy");

    PotentialEnergyReporter::new(config(&path, 1))
        .report(&frame(1))
        .unwrap();
    // A new reporter on the same file keeps appending
    let mut second = PotentialEnergyReporter::new(config(&path, 1));
    second.report(&frame(2)).unwrap();
    second.report(&frame(3)).unwrap();

    let e = read_array::<f64>(&path).unwrap();
    assert_close(e.data(), &[-1.0, -2.0, -3.0]);
}

#[test]
fn test_missing_quantity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forces.npy");
    let mut reporter = ForceReporter::new(config(&path, 1));

    let state = Frame {
        forces: None,
        ..frame(1)
    };
    let err = reporter.report(&state).unwrap_err();
    assert!(matches!(err, ReportError::MissingQuantity("forces")));
    assert!(!path.exists());
}

#[test]
fn test_row_shape_is_fixed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("positions.npy");
    let mut reporter = PositionReporter::new(config(&path, 1));
    reporter.report(&frame(1)).unwrap();

    // Rows stay N×3, so a different particle count still appends
    let fewer = Frame {
        positions: Some(vec![[0.0; 3]]),
        ..Frame::default()
    };
    reporter.report(&fewer).unwrap();
    assert_eq!(read_array::<f64>(&path).unwrap().shape(), &[3, 3]);

    // A scalar stream cannot share a file of N×3 rows
    let mut energy = PotentialEnergyReporter::new(config(&path, 1));
    let err = energy.report(&frame(2)).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Store(StoreError::ShapeMismatch { .. })
    ));
}
