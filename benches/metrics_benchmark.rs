use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use det_eval::dataset::InMemorySource;
use det_eval::detector::FixtureDetector;
use det_eval::evaluator::{evaluate, EvaluationConfig};
use det_eval::matching::match_image;
use det_eval::metrics::calculate_iou;
use det_eval::types::{BoundingBox, Detection, GroundTruth, ImageSample, LabelMap};

fn bench_iou_calculation(c: &mut Criterion) {
    let bbox1 = BoundingBox::new(10.0, 10.0, 60.0, 60.0);
    let bbox2 = BoundingBox::new(30.0, 30.0, 80.0, 80.0);

    c.bench_function("iou_single", |b| {
        b.iter(|| calculate_iou(black_box(&bbox1), black_box(&bbox2)));
    });
}

fn bench_iou_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("iou_pairs");

    for size in [10, 50, 100, 500].iter() {
        let boxes: Vec<BoundingBox> = (0..*size)
            .map(|i| {
                let offset = (i as f64) * 2.0;
                BoundingBox::new(offset, offset, offset + 50.0, offset + 50.0)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for i in 0..boxes.len() {
                    for j in 0..boxes.len() {
                        black_box(calculate_iou(&boxes[i], &boxes[j]));
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_match_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_image");

    for size in [10, 50, 100].iter() {
        let detections: Vec<Detection> = (0..*size)
            .map(|i| {
                let offset = (i as f64) * 10.0;
                Detection::new(
                    BoundingBox::new(offset, offset, offset + 50.0, offset + 50.0),
                    1,
                    0.9,
                )
            })
            .collect();
        let ground_truths: Vec<GroundTruth> = (0..*size)
            .map(|i| {
                let offset = (i as f64) * 10.0 + 2.0;
                GroundTruth::new(
                    BoundingBox::new(offset, offset, offset + 50.0, offset + 50.0),
                    1,
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(match_image(&detections, &ground_truths, 0.5)));
        });
    }
    group.finish();
}

fn bench_full_evaluation(c: &mut Criterion) {
    let samples: Vec<ImageSample> = (0..50u64)
        .map(|image_id| {
            let ground_truth = (0..10)
                .map(|i| {
                    let offset = (i as f64) * 20.0;
                    GroundTruth::new(
                        BoundingBox::new(offset, offset, offset + 18.0, offset + 18.0),
                        (i % 3) as u64 + 1,
                    )
                })
                .collect();
            ImageSample::new(image_id, ground_truth)
        })
        .collect();

    let mut detector = FixtureDetector::new();
    for image_id in 0..50u64 {
        let detections = (0..10)
            .map(|i| {
                let offset = (i as f64) * 20.0 + 1.0;
                Detection::new(
                    BoundingBox::new(offset, offset, offset + 18.0, offset + 18.0),
                    (i % 3) as u64 + 1,
                    0.9 - (i as f64) * 0.02,
                )
            })
            .collect();
        detector = detector.with_response(image_id, detections);
    }

    let mut labels = LabelMap::new();
    labels.insert(1, "person");
    labels.insert(2, "car");
    labels.insert(3, "dog");

    let config = EvaluationConfig {
        num_samples: 50,
        ..EvaluationConfig::default()
    };

    c.bench_function("evaluate_50_images", |b| {
        b.iter(|| {
            let mut source = InMemorySource::new(samples.clone());
            black_box(evaluate(&mut source, &detector, &labels, &config).unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_iou_calculation,
    bench_iou_pairs,
    bench_match_image,
    bench_full_evaluation
);
criterion_main!(benches);
