//! IEEE 488.2 common commands: `*IDN?`, `*RST`, `*CLS`.

use scpi_proto::{endpoint, Arguments, Context, Interpreter, Placement, Response};

use super::{command, no_arguments, SharedInstrument};

pub(super) fn register(interp: &mut Interpreter<SharedInstrument>) {
    let root = interp.tree().root();

    interp.register(
        root,
        Placement::Child,
        "*IDN?",
        "*IDN?",
        command(|instrument, args| {
            no_arguments(args)?;
            Ok(Response::text(instrument.identity()))
        }),
    );

    interp.register(
        root,
        Placement::Child,
        "*RST",
        "*RST",
        command(|instrument, args| {
            no_arguments(args)?;
            instrument.reset();
            Ok(Response::empty())
        }),
    );

    // Clears this session's queue only.
    interp.register(
        root,
        Placement::Child,
        "*CLS",
        "*CLS",
        endpoint(|ctx: &mut Context<SharedInstrument>, _: &Arguments<'_>| {
            ctx.errors.clear();
            Some(Response::empty())
        }),
    );
}
