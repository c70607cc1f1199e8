//! Tests for creating environments through the registry

use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use ndarray::arr1;

use mdpkit_env::{
    default_registry, EnvArgs, EnvError, EnvRegistry, Environment, FiniteMdp, MountainCar,
    Registrable, TimeLimit,
};

#[test]
fn test_default_registry_contents() {
    let registry = default_registry();
    assert_eq!(registry.list_registered(), vec!["FiniteMdp", "MountainCar"]);
}

#[test]
fn test_repeated_registration_lists_once() {
    let mut registry = default_registry();
    registry.register::<FiniteMdp>();
    registry.register::<MountainCar>();
    registry.register::<FiniteMdp>();

    let names = registry.list_registered();
    assert_eq!(names.iter().filter(|n| *n == "FiniteMdp").count(), 1);
    assert_eq!(names.len(), 2);
}

#[test]
fn test_create_unknown() {
    let registry = default_registry();
    let Err(err) = registry.create("X", &EnvArgs::new()) else {
        panic!("unregistered name must not construct an environment");
    };
    assert!(matches!(err, EnvError::UnknownEnvironment(_)));
    assert_eq!(err.to_string(), "Unknown environment: X");
}

#[test]
fn test_generate_simple_chain() {
    let registry = default_registry();
    let args = EnvArgs::new()
        .arg(5)
        .kwarg_serialized("goal_states", &[2])
        .unwrap()
        .kwarg("prob", 1.0)
        .kwarg("rew", 10.0)
        .kwarg("horizon", 25);

    let mut env = registry.generate("FiniteMdp", &args).unwrap();
    assert_eq!(env.info().size().unwrap(), 7);
    assert_eq!(env.info().horizon(), 25);

    env.reset(Some(&arr1(&[1.0]))).unwrap();
    let (state, reward, absorbing, info) = env.step(&arr1(&[0.0])).unwrap().into_parts();
    assert_eq!(state, arr1(&[2.0]));
    assert_relative_eq!(reward, 10.0);
    assert!(!absorbing);
    assert!(info.is_empty());
    env.stop().unwrap();
}

#[test]
fn test_generate_missing_factory() {
    let registry = default_registry();
    let Err(err) = registry.generate("MountainCar", &EnvArgs::new()) else {
        panic!("MountainCar has no generate factory");
    };
    assert!(matches!(err, EnvError::MissingGenerator(name) if name == "MountainCar"));
}

#[test]
fn test_create_mountain_car_with_kwargs() {
    let registry = default_registry();
    let args = EnvArgs::new().kwarg("horizon", 10);

    let mut env = registry.create("MountainCar", &args).unwrap();
    assert_eq!(env.info().horizon(), 10);
    assert_eq!(env.info().shape(), vec![2, 1]);

    env.seed(1).unwrap();
    let obs = env.reset(None).unwrap();
    assert_eq!(obs.len(), 2);
}

#[test]
fn test_arguments_forwarded_unmodified() {
    let seen: Arc<Mutex<Vec<EnvArgs>>> = Arc::default();
    let mut registry = EnvRegistry::new();

    let on_create = Arc::clone(&seen);
    let on_generate = Arc::clone(&seen);
    registry.register_with_generator(
        "Recorder",
        move |args: &EnvArgs| {
            on_create.lock().unwrap().push(args.clone());
            Ok(Box::new(MountainCar::create(args)?) as Box<dyn Environment>)
        },
        move |args: &EnvArgs| {
            on_generate.lock().unwrap().push(args.clone());
            Ok(Box::new(FiniteMdp::simple_chain(3, &[2], 0.5, 1.0, None, 0.5, 7)?)
                as Box<dyn Environment>)
        },
    );

    let args = EnvArgs::new()
        .arg("first")
        .arg(2)
        .kwarg("gamma", 0.5)
        .kwarg("nested", serde_json::json!({"a": [1, 2]}));

    let created = registry.create("Recorder", &EnvArgs::new().kwarg("gamma", 0.5)).unwrap();
    let generated = registry.generate("Recorder", &args).unwrap();

    assert_relative_eq!(created.info().gamma(), 0.5);
    assert_eq!(generated.info().horizon(), 7);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1], args);
}

#[test]
fn test_time_limited_episode() {
    let registry = default_registry();
    let args = EnvArgs::new()
        .arg(4)
        .kwarg_serialized("goal_states", &[3])
        .unwrap()
        .kwarg("prob", 0.0)
        .kwarg("rew", 1.0)
        .kwarg("horizon", 5);

    let mut env = TimeLimit::new(registry.generate("FiniteMdp", &args).unwrap());
    env.seed(9).unwrap();
    env.reset(Some(&arr1(&[0.0]))).unwrap();

    let mut steps = 0;
    loop {
        let step = env.step(&arr1(&[0.0])).unwrap();
        steps += 1;
        if step.absorbing || step.info.get("truncated").is_some() {
            break;
        }
    }
    assert_eq!(steps, 5);
}
