//! `protect set <state>`: write a new target state.

use protect_core::SecurityState;
use protect_core::mapping::host_to_vendor;

use crate::cli::{GlobalOpts, SetArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(args: &SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = SecurityState::from(args.state);
    let accessory = util::start_accessory(global).await?;
    let result = accessory.set_target_state(target).await;
    // Let the post-write attribution check log who made the change.
    accessory.attributor().wait_post_write_checks().await;
    accessory.shutdown().await;
    result?;

    if !global.quiet {
        eprintln!(
            "Alarm set to {target} (vendor status \"{}\") on {}",
            host_to_vendor(target),
            accessory.site()
        );
    }
    Ok(())
}
