mod tests_diagnostics;
mod tests_directives;
mod tests_entry_points;
mod tests_members;
