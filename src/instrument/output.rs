//! `OUTPut` on/off switch.

use scpi_proto::{Interpreter, Placement, Response};

use super::{command, no_arguments, single_argument, SharedInstrument};
use crate::error::HandlerError;

pub(super) fn register(interp: &mut Interpreter<SharedInstrument>) {
    let root = interp.tree().root();

    let output = interp.register_keyword(
        root,
        Placement::Child,
        "OUTPut",
        command(|instrument, args| {
            let arg = single_argument(args)?;
            instrument.output = if arg.eq_keyword("ON") || arg.eq_keyword("1") {
                true
            } else if arg.eq_keyword("OFF") || arg.eq_keyword("0") {
                false
            } else {
                return Err(HandlerError::DataType(
                    String::from_utf8_lossy(arg.trimmed()).into_owned(),
                ));
            };
            Ok(Response::empty())
        }),
    );
    interp.register_keyword(
        output,
        Placement::Sibling,
        "OUTPut?",
        command(|instrument, args| {
            no_arguments(args)?;
            Ok(Response::text(if instrument.output() { "1" } else { "0" }))
        }),
    );
}
