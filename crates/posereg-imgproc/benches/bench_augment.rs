use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use posereg_image::{DynamicImage, Image};
use posereg_imgproc::{
    augment::{elastic_transform, ElasticParams},
    preprocess::{preprocess, PreprocessParams},
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_elastic_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("ElasticTransform");

    for (width, height) in [(128, 128), (256, 256)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![127u8; width * height * 3]).unwrap();
        let params = ElasticParams::from_image_height(*height, 2.0, 0.08, 0.08);

        group.bench_with_input(
            BenchmarkId::new("elastic", &parameter_string),
            &image,
            |b, src| {
                let mut rng = StdRng::seed_from_u64(0);
                b.iter(|| elastic_transform(black_box(src), black_box(&params), &mut rng))
            },
        );
    }
    group.finish();
}

fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("Preprocess");

    for (width, height) in [(640, 480), (1280, 960)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = DynamicImage::from(
            Image::<u8, 4>::new(image_size, vec![200u8; width * height * 4]).unwrap(),
        );
        let params = PreprocessParams::default();

        group.bench_with_input(
            BenchmarkId::new("rgba_mask_area", &parameter_string),
            &image,
            |b, src| b.iter(|| preprocess(black_box(src), black_box(&params))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_elastic_transform, bench_preprocess);
criterion_main!(benches);
