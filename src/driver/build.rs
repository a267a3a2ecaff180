// src/driver/build.rs

//! Per-variant target build.

use std::path::Path;

use tracing::info;

use crate::errors::DriveError;
use crate::exec::{Invocation, MAX_ATTEMPTS, with_retry};
use crate::proto::Event;

use super::{CommandBackend, ProjectDriver, Result};

impl<B: CommandBackend> ProjectDriver<B> {
    /// Build the project for one PIE variant.
    ///
    /// The project tree is staged fresh into `target[+PIE]` so stale
    /// artifacts from a previous variant can't leak into ABI discovery.
    /// The build command itself is retried on the directory-creation race.
    pub(super) async fn build(&self, pie: bool) -> Result<()> {
        self.notice(format!(
            "BLD {} [{}]{}",
            self.project.class,
            self.project.name,
            self.variant(pie)
        ));

        let dstdir = self.variant_dir(pie);
        self.fs.remove_tree(&dstdir)?;
        if let Some(parent) = dstdir.parent() {
            self.fs.create_dir_all(parent)?;
        }
        self.fs.copy_tree(&self.project.path, &dstdir)?;

        let result = match self.build_invocation(&dstdir, pie) {
            Ok(invocation) => {
                let what = format!("build of project '{}'", self.project.name);
                with_retry(&what, MAX_ATTEMPTS, || {
                    self.backend.run(invocation.clone(), None)
                })
                .await
                .map(|_| ())
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                self.sink.report(&Event::BuildSuccess {
                    path: self.path_str(),
                    pie,
                });
                Ok(())
            }
            Err(err) => {
                info!("ERROR: {err}");
                self.notice(format!(
                    "   ---> FAILURE: TARGET BUILD [{}]",
                    self.project.name
                ));
                self.sink.report(&Event::BuildFailed {
                    path: self.path_str(),
                    pie: Some(pie),
                });
                Err(err)
            }
        }
    }

    /// Pick the build mechanism: a project-local `build.sh`, else the
    /// generic NDK build driver. Verbosity and PIE selection go through the
    /// environment either way.
    fn build_invocation(&self, dstdir: &Path, pie: bool) -> Result<Invocation> {
        let local = dstdir.join("build.sh");
        let generic = self.options.ndk.join("ndk-build");
        let pie_value = if pie { "true" } else { "false" };

        if self.fs.exists(&local) {
            let mut invocation = Invocation::new(&local)
                .current_dir(dstdir)
                .env("V", "1")
                .env("APP_PIE", pie_value);
            if let Some(jobs) = self.options.jobs {
                invocation = invocation.env("JOBS", jobs.to_string());
            }
            Ok(invocation)
        } else if self.fs.exists(&generic) {
            let mut invocation = Invocation::new(&generic)
                .current_dir(dstdir)
                .env("V", "1")
                .env("APP_PIE", pie_value)
                .arg("-B");
            if let Some(jobs) = self.options.jobs {
                invocation = invocation.arg(format!("-j{jobs}"));
            }
            // The generic driver also takes the settings as make variables.
            invocation = invocation.arg("V=1").arg(format!("APP_PIE={pie_value}"));
            Ok(invocation)
        } else {
            Err(DriveError::ConfigError(format!(
                "don't know how to build project '{}'",
                self.project.name
            )))
        }
    }
}
