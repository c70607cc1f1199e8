//! Example: random actions on environments built through the registry

use ndarray::arr1;
use rand::Rng;
use tracing_subscriber::EnvFilter;

use mdpkit_env::{default_registry, EnvArgs, Environment, TimeLimit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging, e.g. RUST_LOG=mdpkit_env=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = default_registry();
    println!("Registered environments: {:?}", registry.list_registered());

    let chain_args = EnvArgs::new()
        .arg(7)
        .kwarg_serialized("goal_states", &[6])?
        .kwarg("prob", 0.9)
        .kwarg("rew", 1.0)
        .kwarg("horizon", 30);

    let envs = [
        ("FiniteMdp", registry.generate("FiniteMdp", &chain_args)?),
        ("MountainCar", registry.create("MountainCar", &EnvArgs::new())?),
    ];

    let mut rng = rand::thread_rng();
    for (name, env) in envs {
        let mut env = TimeLimit::new(env);
        let n_actions = env.info().action_space().size()?;
        let gamma = env.info().gamma();

        env.seed(42)?;
        env.reset(None)?;

        let mut discounted_return = 0.0;
        let mut discount = 1.0;
        loop {
            let action = arr1(&[rng.gen_range(0..n_actions) as f64]);
            let step = env.step(&action)?;
            discounted_return += discount * step.reward;
            discount *= gamma;

            if step.absorbing || env.is_truncated() {
                break;
            }
        }
        env.render()?;

        println!(
            "{name}: {} steps, discounted return {discounted_return:.3}",
            env.steps()
        );
        env.stop()?;
    }

    Ok(())
}
