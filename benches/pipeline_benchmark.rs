use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use pca_reconstruct::{pca, projection_matrix, EigenSolverKind, PcaConfig, PcaPipeline};

fn generate_data(n_samples: usize, n_features: usize) -> Array2<f64> {
    Array::random((n_samples, n_features), Uniform::new(0., 10.))
}

// Full reconstruction with each eigen solver
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("PCA_reconstruct");

    let general = PcaPipeline::new(PcaConfig {
        eigen_solver: EigenSolverKind::General,
        ..PcaConfig::default()
    });

    for &(n_samples, n_features) in [(100, 10), (500, 50), (1000, 200)].iter() {
        let data = generate_data(n_samples, n_features);
        let k = (n_features / 5).max(1);
        group.throughput(Throughput::Elements((n_samples * n_features) as u64));

        group.bench_with_input(
            BenchmarkId::new("general", format!("{}x{}", n_samples, n_features)),
            &data,
            |b, data_matrix| b.iter(|| general.run(data_matrix.view(), k).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("symmetric", format!("{}x{}", n_samples, n_features)),
            &data,
            |b, data_matrix| b.iter(|| pca(data_matrix.view(), k).unwrap()),
        );
    }
    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_matrix");

    for &(d_features, m_vectors) in [(50, 5), (200, 20), (500, 50)].iter() {
        let basis = generate_data(d_features, m_vectors);
        group.bench_with_input(
            BenchmarkId::new("projection", format!("{}x{}", d_features, m_vectors)),
            &basis,
            |b, basis| b.iter(|| projection_matrix(basis.view()).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_projection);
criterion_main!(benches);
