// src/driver/host.rs

//! Pre-flight host validation.
//!
//! A project with a `host/GNUmakefile` recipe can be built and run on the
//! build machine itself before any cross-compilation happens. The recipe
//! must support a `test` target and honor a `CC` override. Failure here is
//! fatal for the whole drive; it is a gate, not a per-variant step.

use tracing::info;

use crate::exec::{Invocation, MAX_ATTEMPTS, with_retry};
use crate::proto::Event;

use super::{CommandBackend, ProjectDriver, Result};

impl<B: CommandBackend> ProjectDriver<B> {
    pub(super) async fn run_on_host(&self) -> Result<()> {
        match self.try_run_on_host().await {
            Ok(()) => Ok(()),
            Err(err) => {
                info!("ERROR: {err}");
                self.notice(format!(
                    "   ---> FAILURE: HOST TEST    [{}]",
                    self.project.name
                ));
                self.sink.report(&Event::BuildFailed {
                    path: self.path_str(),
                    pie: None,
                });
                Err(err)
            }
        }
    }

    async fn try_run_on_host(&self) -> Result<()> {
        // Host validation only works on Linux and macOS hosts.
        if !cfg!(any(target_os = "linux", target_os = "macos")) {
            return Ok(());
        }
        if self.options.disable_host_tests {
            return Ok(());
        }

        let recipe = self.project.path.join("host").join("GNUmakefile");
        if !self.fs.exists(&recipe) {
            return Ok(());
        }

        let host_os = if cfg!(target_os = "macos") {
            "darwin"
        } else {
            "linux"
        };
        if self
            .project
            .properties
            .onhost_disabled_os
            .iter()
            .any(|os| host_os.contains(os.as_str()))
        {
            return Ok(());
        }

        self.notice(format!("HST {} [{}]", self.project.class, self.project.name));

        for cc in &self.options.host_compilers {
            if self
                .project
                .properties
                .onhost_disabled_cc
                .iter()
                .any(|disabled| disabled == cc)
            {
                continue;
            }

            let dir = self.tmpdir.join(format!("host-{cc}"));
            self.fs.remove_tree(&dir)?;
            if let Some(parent) = dir.parent() {
                self.fs.create_dir_all(parent)?;
            }
            self.fs.copy_tree(&self.project.path, &dir)?;

            let mut invocation = Invocation::new(&self.options.make)
                .arg("-C")
                .arg(dir.join("host").display().to_string())
                .arg("-B");
            if let Some(jobs) = self.options.jobs {
                invocation = invocation.arg(format!("-j{jobs}"));
            }
            let invocation = invocation.arg("test").arg(format!("CC={cc}"));

            let what = format!("host validation of '{}'", self.project.name);
            with_retry(&what, MAX_ATTEMPTS, || {
                self.backend.run(invocation.clone(), None)
            })
            .await?;

            self.fs.remove_tree(&dir)?;
        }

        info!("== OK: all on-host tests PASSED");
        Ok(())
    }
}
