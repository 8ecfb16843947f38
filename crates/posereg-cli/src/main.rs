use argh::FromArgs;
use std::path::PathBuf;

use posereg::dataset::{
    augment::augment_samples, load_and_split, load_poses, pair_samples, PipelineConfig,
};
use posereg::imgproc::{augment::elastic_transform, preprocess};
use posereg::io::functional as F;
use posereg::k3d::{io::obj::read_obj_vertices, metrics, PoseVector, TranslationScale};

#[derive(FromArgs)]
/// Dataset and pose error tools for single-image pose regression
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Split(SplitArgs),
    Compare(CompareArgs),
    Add(AddArgs),
    Augment(AugmentArgs),
}

#[derive(FromArgs)]
/// Split a rendered dataset by style and join it with its labels
#[argh(subcommand, name = "split")]
struct SplitArgs {
    /// path to the pipeline configuration (JSON)
    #[argh(option)]
    config: Option<PathBuf>,

    /// directory with the rendered images
    #[argh(option)]
    images: PathBuf,

    /// path to the pose labels (JSON)
    #[argh(option)]
    poses: PathBuf,
}

#[derive(FromArgs)]
/// Translation and rotation error between two poses
#[argh(subcommand, name = "compare")]
struct CompareArgs {
    /// predicted pose as rx,ry,rz,tx,ty,tz
    #[argh(option, from_str_fn(parse_pose))]
    pred: PoseVector,

    /// ground truth pose as rx,ry,rz,tx,ty,tz
    #[argh(option, from_str_fn(parse_pose))]
    gt: PoseVector,

    /// translation scale as sx,sy,sz
    #[argh(option, from_str_fn(parse_scale), default = "TranslationScale::default()")]
    ts: TranslationScale,
}

#[derive(FromArgs)]
/// Average distance of the mesh vertices placed by two poses
#[argh(subcommand, name = "add")]
struct AddArgs {
    /// path to the object mesh (OBJ)
    #[argh(option)]
    mesh: PathBuf,

    /// predicted pose as rx,ry,rz,tx,ty,tz
    #[argh(option, from_str_fn(parse_pose))]
    pred: PoseVector,

    /// ground truth pose as rx,ry,rz,tx,ty,tz
    #[argh(option, from_str_fn(parse_pose))]
    gt: PoseVector,

    /// translation scale as sx,sy,sz
    #[argh(option, from_str_fn(parse_scale), default = "TranslationScale::default()")]
    ts: TranslationScale,
}

#[derive(FromArgs)]
/// Preprocess an image and write one elastically deformed copy
#[argh(subcommand, name = "augment")]
struct AugmentArgs {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// seed of the deformation, overrides the configuration
    #[argh(option)]
    seed: Option<u64>,

    /// path to the pipeline configuration (JSON)
    #[argh(option)]
    config: Option<PathBuf>,
}

fn parse_values<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let values = value
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{value}': {e}"))?;
    values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected {N} values, got {}", v.len()))
}

fn parse_pose(value: &str) -> Result<PoseVector, String> {
    parse_values::<6>(value).map(PoseVector::from)
}

fn parse_scale(value: &str) -> Result<TranslationScale, String> {
    TranslationScale::new(parse_values::<3>(value)?).map_err(|e| e.to_string())
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    })
}

fn run_split(args: SplitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_ref())?;

    let split = load_and_split(&args.images, &config.split_params())?;

    let train_poses = load_poses(&args.poses, &config.train_pose_params())?;
    let valid_poses = load_poses(&args.poses, &config.valid_pose_params())?;
    train_poses.verify_key_order()?;
    valid_poses.verify_key_order()?;

    let mut train = pair_samples(split.train, &train_poses)?;
    let mut valid = pair_samples(split.valid, &valid_poses)?;

    if config.augmentation.enabled {
        let params = config.elastic_params();
        let mut rng = config.rng();
        train = augment_samples(train, &params, &mut rng)?;
        valid = augment_samples(valid, &params, &mut rng)?;
    }

    println!("train: {} samples", train.len());
    println!("valid: {} samples", valid.len());

    Ok(())
}

fn run_compare(args: CompareArgs) -> Result<(), Box<dyn std::error::Error>> {
    let errors = metrics::compare_poses(&args.pred, &args.gt, &args.ts)?;
    println!("translation error: {}", errors.translation);
    println!("rotation error: {} deg", errors.rotation_deg);
    Ok(())
}

fn run_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = read_obj_vertices(&args.mesh)?;
    let add = metrics::compute_add(&args.gt, &args.pred, &mesh, &args.ts)?;
    println!("ADD: {add}");
    Ok(())
}

fn run_augment(args: AugmentArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let image = F::read_image(&args.input)?;

    let params = preprocess::PreprocessParams {
        size: config.image_size(),
        apply_mask: config.apply_mask,
        ..Default::default()
    };
    let rgb = preprocess::preprocess(&image, &params)?;

    let deformed = elastic_transform(&rgb, &config.elastic_params(), &mut config.rng())?;
    F::write_image_rgb8(&args.output, &deformed)?;

    log::info!(
        "wrote deformed {} to {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    match args.command {
        Command::Split(args) => run_split(args),
        Command::Compare(args) => run_compare(args),
        Command::Add(args) => run_add(args),
        Command::Augment(args) => run_augment(args),
    }
}
