use std::sync::Arc;

use hush_engine::factory::{LITE_UUID, SOFTWARE_UUID};
use hush_engine::{
    register_default_services, DispatchPool, Registry, TransportConfig, DEFAULT_INSTANCE,
};
use hush_hal::noise_suppression::{Level, NoiseSuppression, NoiseSuppressionTag, TYPE_UUID};
use hush_hal::{CommandId, ExceptionCode, OpenParameters, Parameter, ParameterId, Specific, State};

fn setup() -> (Registry, Arc<DispatchPool>) {
    let pool = DispatchPool::start(&TransportConfig::default()).unwrap();
    let registry = Registry::new();
    register_default_services(&registry, &pool);
    (registry, pool)
}

#[test]
fn default_services_advertise_both_implementations() {
    let (registry, _pool) = setup();
    assert_eq!(registry.instances(), [DEFAULT_INSTANCE]);

    let found = registry.discover(&TYPE_UUID);
    let uuids: Vec<_> = found.iter().map(|(_, d)| d.uuid).collect();
    assert_eq!(uuids, [SOFTWARE_UUID, LITE_UUID]);
    assert!(found.iter().all(|(_, d)| d.type_uuid == TYPE_UUID));
}

#[test]
fn suppress_noise_through_proxy() {
    let (registry, _pool) = setup();
    let (factory, descriptor) = registry.discover(&TYPE_UUID).into_iter().next().unwrap();

    let fx = factory.create_effect(&descriptor.uuid).unwrap().unwrap();
    let common = OpenParameters::default();
    let high = Specific::NoiseSuppression(NoiseSuppression::Level(Level::High));
    fx.open(&common, Some(&high)).unwrap();
    assert_eq!(
        fx.get_parameter(&ParameterId::NoiseSuppression(NoiseSuppressionTag::Level)).unwrap(),
        Parameter::noise_suppression(NoiseSuppression::Level(Level::High))
    );
    fx.command(CommandId::Start).unwrap();

    // a second of low, steady hiss in buffer-sized blocks
    let block = common.input.samples_per_buffer();
    let mut seed = 7u32;
    let mut energy_in = 0.0f32;
    let mut energy_out = 0.0f32;
    let blocks = common.input.sample_rate as usize * 2 / block;
    for i in 0..blocks {
        let input: Vec<f32> = (0..block)
            .map(|_| {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((seed >> 16) as f32 / 32_768.0 - 1.0) * 0.01
            })
            .collect();
        let mut output = vec![0.0f32; block];
        assert_eq!(fx.process(&input, &mut output).unwrap(), block);
        if i >= blocks / 2 {
            energy_in += input.iter().map(|s| s * s).sum::<f32>();
            energy_out += output.iter().map(|s| s * s).sum::<f32>();
        }
    }
    assert!(energy_out < energy_in * 0.5, "hiss not suppressed: {energy_out} vs {energy_in}");

    assert_eq!(factory.destroy_effect(&fx).unwrap_err().code, ExceptionCode::IllegalState);
    fx.command(CommandId::Stop).unwrap();
    fx.close().unwrap();
    assert_eq!(fx.state().unwrap(), State::Init);
    factory.destroy_effect(&fx).unwrap();
}

#[test]
fn lite_rejects_high() {
    let (registry, _pool) = setup();
    let factory = registry.get(DEFAULT_INSTANCE).unwrap();
    let fx = factory.create_effect(&LITE_UUID).unwrap().unwrap();
    fx.open(&OpenParameters::default(), None).unwrap();

    let high = Parameter::noise_suppression(NoiseSuppression::Level(Level::High));
    let err = fx.set_parameter(&high).unwrap_err();
    assert_eq!(err.code, ExceptionCode::IllegalArgument);

    fx.close().unwrap();
    factory.destroy_effect(&fx).unwrap();
}
