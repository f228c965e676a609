//! Step through k-means on a simple 2D dataset, printing every snapshot.
//!
//! Run with `RUST_LOG=debug` to see the engine's trace events.

use lloyd::{CentroidOverride, Initialization, Kmeans};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
    ];

    for init in [
        Initialization::Random,
        Initialization::Farthest,
        Initialization::KmeansPlusPlus,
    ] {
        let mut kmeans = Kmeans::new(3).with_initialization(init).with_seed(42);
        kmeans.initialize(&data, None).unwrap();
        let last = kmeans.run(&data).unwrap();

        println!("=== {init} ===");
        for snapshot in kmeans.history() {
            let centroids: Vec<String> = snapshot
                .centroids
                .iter()
                .map(|c| format!("({:5.2}, {:5.2})", c[0], c[1]))
                .collect();
            println!(
                "  iter {:2} sizes {:?} centroids {}",
                snapshot.iteration,
                snapshot.cluster_sizes(),
                centroids.join(" ")
            );
        }
        println!(
            "  converged: {} after {} iterations, inertia {:.4}",
            last.converged,
            last.iteration,
            kmeans.inertia(&data).unwrap()
        );
    }

    // --- Manual placement, then a drag before the first step ---
    let mut kmeans = Kmeans::new(3)
        .with_initialization(Initialization::Manual)
        .with_seed(42);
    kmeans
        .initialize(&data, Some(&[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]))
        .unwrap();
    let dragged = CentroidOverride::manual(vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![10.0, 0.0]]);
    let last = kmeans.run_with(&data, &dragged).unwrap();

    println!("\n=== manual ===");
    let eval = kmeans.evaluate(&data).unwrap();
    for (i, (label, centroid)) in eval.labels.iter().zip(eval.centroids.iter()).enumerate() {
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {} at ({:5.2}, {:5.2})",
            i, data[i][0], data[i][1], label, centroid[0], centroid[1]
        );
    }
    println!("  converged: {} at iteration {}", last.converged, last.iteration);
}
