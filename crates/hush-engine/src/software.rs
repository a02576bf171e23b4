//! Software noise suppression.

use parking_lot::Mutex;
use tracing::{debug, trace};

use hush_hal::noise_suppression::{Level, NoiseSuppression, NoiseSuppressionTag, Type};
use hush_hal::{
    AudioConfig, CommandId, CommonParameter, CommonTag, Descriptor, Effect, OpenParameters,
    Parameter, ParameterId, Specific, State, Status,
};

use crate::dsp::suppressor::Suppressor;
use crate::graph::Chain;

/// Per-session state, alive between open and close.
struct Context {
    common: OpenParameters,
    level: Level,
    ty: Type,
    chain: Chain,
}

impl Context {
    fn new(common: OpenParameters) -> Self {
        let level = Level::default();
        let ty = Type::default();
        let chain = build_chain(&common.input, level, ty);
        Self { common, level, ty, chain }
    }

    fn rebuild(&mut self) {
        self.chain = build_chain(&self.common.input, self.level, self.ty);
    }
}

fn build_chain(cfg: &AudioConfig, level: Level, ty: Type) -> Chain {
    let mut chain = Chain::new(cfg.sample_rate, cfg.channels);
    let linked = ty == Type::SingleChannel;
    chain.push(Box::new(Suppressor::new(level.max_attenuation_db(), linked)));
    chain
}

struct Inner {
    state: State,
    context: Option<Context>,
}

/// Noise suppression running entirely in software.
pub struct NoiseSuppressionSw {
    descriptor: Descriptor,
    inner: Mutex<Inner>,
}

impl NoiseSuppressionSw {
    pub fn new(descriptor: Descriptor) -> Self {
        Self { descriptor, inner: Mutex::new(Inner { state: State::Init, context: None }) }
    }

    fn set_specific(&self, ctx: &mut Context, ns: &NoiseSuppression) -> hush_hal::Result<()> {
        if let NoiseSuppression::VendorExtension(_) = ns {
            return Err(Status::unsupported("vendor extension not supported"));
        }
        if !self.descriptor.capability.accepts(ns) {
            return Err(Status::illegal_argument(format!("{ns:?} outside capability")));
        }
        match *ns {
            NoiseSuppression::Level(level) => {
                ctx.level = level;
                ctx.chain.set_param_db("max_attenuation", level.max_attenuation_db());
            }
            NoiseSuppression::Type(ty) => {
                if ctx.ty != ty {
                    ctx.ty = ty;
                    ctx.rebuild();
                }
            }
            NoiseSuppression::VendorExtension(_) => {}
        }
        Ok(())
    }
}

fn set_common(ctx: &mut Context, common: &CommonParameter) -> hush_hal::Result<()> {
    let mut next = ctx.common.clone();
    match common {
        CommonParameter::Input(cfg) => next.input = cfg.clone(),
        CommonParameter::Output(cfg) => next.output = cfg.clone(),
        CommonParameter::Session(session) => next.session = *session,
        CommonParameter::IoHandle(io) => next.io_handle = *io,
    }
    next.validate()?;
    let reconfigure = next.input != ctx.common.input;
    ctx.common = next;
    if reconfigure {
        ctx.rebuild();
    }
    Ok(())
}

impl Effect for NoiseSuppressionSw {
    fn open(&self, common: &OpenParameters, specific: Option<&Specific>) -> hush_hal::Result<()> {
        let mut inner = self.inner.lock();
        if inner.state != State::Init {
            debug!(name = %self.descriptor.name, "already open");
            return Ok(());
        }
        common.validate()?;

        let mut ctx = Context::new(common.clone());
        if let Some(Specific::NoiseSuppression(ns)) = specific {
            self.set_specific(&mut ctx, ns)?;
        }
        debug!(
            name = %self.descriptor.name,
            sample_rate = common.input.sample_rate,
            frames = common.input.frame_count,
            level = %ctx.level,
            "opened"
        );
        inner.context = Some(ctx);
        inner.state = State::Idle;
        Ok(())
    }

    fn close(&self) -> hush_hal::Result<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::Init => Ok(()),
            State::Processing => Err(Status::illegal_state("close while processing")),
            State::Idle => {
                inner.context = None;
                inner.state = State::Init;
                debug!(name = %self.descriptor.name, "closed");
                Ok(())
            }
        }
    }

    fn descriptor(&self) -> hush_hal::Result<Descriptor> {
        Ok(self.descriptor.clone())
    }

    fn state(&self) -> hush_hal::Result<State> {
        Ok(self.inner.lock().state)
    }

    fn command(&self, command: CommandId) -> hush_hal::Result<()> {
        let mut inner = self.inner.lock();
        let Inner { state, context } = &mut *inner;
        let ctx = context.as_mut().ok_or_else(|| Status::illegal_state("effect not open"))?;
        *state = match command {
            CommandId::Start => State::Processing,
            CommandId::Stop => State::Idle,
            CommandId::Reset => {
                ctx.chain.reset();
                State::Idle
            }
        };
        trace!(%command, state = %*state, "command");
        Ok(())
    }

    fn set_parameter(&self, param: &Parameter) -> hush_hal::Result<()> {
        let mut inner = self.inner.lock();
        let ctx = inner.context.as_mut().ok_or_else(|| Status::illegal_state("effect not open"))?;
        match param {
            Parameter::Common(common) => set_common(ctx, common),
            Parameter::Specific(Specific::NoiseSuppression(ns)) => self.set_specific(ctx, ns),
        }
    }

    fn get_parameter(&self, id: &ParameterId) -> hush_hal::Result<Parameter> {
        let inner = self.inner.lock();
        let ctx = inner.context.as_ref().ok_or_else(|| Status::illegal_state("effect not open"))?;
        Ok(match id {
            ParameterId::Common(tag) => Parameter::Common(match tag {
                CommonTag::Input => CommonParameter::Input(ctx.common.input.clone()),
                CommonTag::Output => CommonParameter::Output(ctx.common.output.clone()),
                CommonTag::Session => CommonParameter::Session(ctx.common.session),
                CommonTag::IoHandle => CommonParameter::IoHandle(ctx.common.io_handle),
            }),
            ParameterId::NoiseSuppression(tag) => Parameter::noise_suppression(match tag {
                NoiseSuppressionTag::Level => NoiseSuppression::Level(ctx.level),
                NoiseSuppressionTag::Type => NoiseSuppression::Type(ctx.ty),
                NoiseSuppressionTag::VendorExtension => {
                    return Err(Status::unsupported("vendor extension not supported"));
                }
            }),
        })
    }

    fn process(&self, input: &[f32], output: &mut [f32]) -> hush_hal::Result<usize> {
        let mut inner = self.inner.lock();
        if inner.state != State::Processing {
            return Err(Status::illegal_state(format!("process in state {}", inner.state)));
        }
        let ctx = inner.context.as_mut().ok_or_else(|| Status::illegal_state("effect not open"))?;
        if output.len() < input.len() {
            return Err(Status::illegal_argument("output shorter than input"));
        }
        let channels = ctx.chain.channels() as usize;
        if input.len() % channels != 0 {
            return Err(Status::illegal_argument("input is not a whole number of frames"));
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        ctx.chain.process(out);
        Ok(input.len())
    }
}
