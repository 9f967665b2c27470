use std::io::Write;

use anyhow::Result;
use primerplan_core::DesignParameters;

use crate::cli::DefaultsArgs;
use crate::dto::ParameterDto;

/// List every parameter as `KEY: value`, in baseline order.
pub fn write_parameters<W: Write>(params: &DesignParameters, out: &mut W) -> std::io::Result<()> {
    for (key, value) in params.iter() {
        writeln!(out, "{}: {}", key, value)?;
    }
    Ok(())
}

pub fn run(args: DefaultsArgs) -> Result<()> {
    let params = DesignParameters::defaults(args.min_amplicon, args.max_amplicon, args.num_primers);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let dtos: Vec<ParameterDto> = params
            .iter()
            .map(|(key, value)| ParameterDto {
                key: key.to_string(),
                value: value.to_string(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut out, &dtos)?;
        writeln!(out)?;
    } else {
        write_parameters(&params, &mut out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_write_parameters() {
        let params = DesignParameters::defaults(100, 300, 2);
        let mut out = Vec::new();
        write_parameters(&params, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), params.len());
        assert_eq!(lines[0], "PRIMER_OPT_SIZE: 20");
        assert!(lines.contains(&"PRIMER_OPT_TM: 52.0"));
        assert!(lines.contains(&"PRIMER_PRODUCT_SIZE_RANGE: 100-300"));
        assert_eq!(lines[lines.len() - 1], "PRIMER_NUM_RETURN: 2");
    }
}
