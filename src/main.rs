// This file is an example of how to use the `dock_watch` library.
// It builds a rig for a small yard and replays a handful of captured triplets.

use dock_watch::core_modules::utils::image_helper::image_helper;
use dock_watch::error::IntakeError;
use dock_watch::{Grid, RigBuilder, RigConfig};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Dock Watch - Example Runner");

    let config = RigConfig {
        max_height: 5,
        ..RigConfig::default()
    };
    let mut rig = RigBuilder::from_config(&config)
        .height_map(vec![vec![1, 2, 3, 4], vec![0, 4, 1, 5], vec![1, 2, 0, 1]])
        .build()?;

    let front = rig.front().reference().clone();
    let side = rig.side().reference().clone();
    let top = rig.top().reference().clone();

    // A floating artifact in the side view is filtered out and the triplet is accepted.
    let noisy_side: Grid = "{TTTTF/TTTTT/TTFTF}".parse()?;
    let captures = [
        ("steady yard", front.clone(), side.clone(), top.clone()),
        ("container moved", front.clone(), side.clone(), "{TTTF/FTTT/TTFT}".parse()?),
        ("side camera knocked", front.clone(), "{TTTTT/TTFFF/FFFFF}".parse()?, top.clone()),
        ("floating artifact", front.clone(), noisy_side, top.clone()),
        ("steady yard again", front, side, top),
    ];

    for (label, front, side, top) in captures {
        match rig.intake(front, side, top) {
            Ok(()) => println!("{label}: accepted"),
            Err(IntakeError::Rejected { role, rejection }) => {
                println!("{label}: {role} camera rejected the triplet ({rejection})");
            }
            Err(err) => return Err(err.into()),
        }
    }

    let png = image_helper::encode_png(rig.top().reference())?;
    info!("top reference encodes to {} PNG bytes", png.len());
    println!(
        "history: front={} side={} top={}",
        rig.front().history().len(),
        rig.side().history().len(),
        rig.top().history().len()
    );
    Ok(())
}
