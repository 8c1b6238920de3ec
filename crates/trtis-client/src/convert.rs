use anyhow::{bail, Context, Result};
use trtis_core::{DType, IOName, InputDef, Layout, ModelDescriptor, OutputDef, StatusSnapshot};

use crate::pb;

/// Converts a status response into the snapshot the resolver works on.
///
/// Unknown enum tags are rejected here rather than mapped to a default, so a
/// newer server cannot slip an unrecognized type past the resolver.
pub fn snapshot_from_status(resp: pb::StatusResponse) -> Result<StatusSnapshot> {
    check_request_status(resp.request_status.as_ref()).context("server status request failed")?;

    let server_status = resp
        .server_status
        .context("status response carries no server status")?;

    let mut snapshot = StatusSnapshot::default();
    for (name, model_status) in server_status.model_status {
        let config = model_status
            .config
            .with_context(|| format!("model {name} has no config in server status"))?;
        let descriptor =
            descriptor_from_config(config).with_context(|| format!("invalid config for model {name}"))?;
        snapshot.models.insert(name, descriptor);
    }
    Ok(snapshot)
}

fn descriptor_from_config(config: pb::ModelConfig) -> Result<ModelDescriptor> {
    let max_batch_size = u32::try_from(config.max_batch_size)
        .with_context(|| format!("negative max_batch_size {}", config.max_batch_size))?;

    let inputs = config
        .input
        .into_iter()
        .map(|input| {
            let layout =
                parse_layout(input.format).with_context(|| format!("input {}", input.name))?;
            let dtype =
                parse_dtype(input.data_type).with_context(|| format!("input {}", input.name))?;
            Ok(InputDef {
                name: IOName(input.name),
                dims: input.dims,
                layout,
                dtype,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let outputs = config
        .output
        .into_iter()
        .map(|output| {
            let dtype =
                parse_dtype(output.data_type).with_context(|| format!("output {}", output.name))?;
            Ok(OutputDef {
                name: IOName(output.name),
                dims: output.dims,
                dtype,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ModelDescriptor {
        max_batch_size,
        inputs,
        outputs,
    })
}

pub fn parse_dtype(raw: i32) -> Result<DType> {
    let dtype = pb::DataType::try_from(raw).context("unknown data type enum value")?;
    Ok(match dtype {
        pb::DataType::TypeBool => DType::Bool,
        pb::DataType::TypeUint8 => DType::U8,
        pb::DataType::TypeUint16 => DType::U16,
        pb::DataType::TypeUint32 => DType::U32,
        pb::DataType::TypeUint64 => DType::U64,
        pb::DataType::TypeInt8 => DType::I8,
        pb::DataType::TypeInt16 => DType::I16,
        pb::DataType::TypeInt32 => DType::I32,
        pb::DataType::TypeInt64 => DType::I64,
        pb::DataType::TypeFp16 => DType::F16,
        pb::DataType::TypeFp32 => DType::F32,
        pb::DataType::TypeFp64 => DType::F64,
        pb::DataType::TypeString => DType::String,
        pb::DataType::TypeInvalid => bail!("data type is invalid"),
    })
}

pub fn parse_layout(raw: i32) -> Result<Layout> {
    let format = pb::model_input::Format::try_from(raw).context("unknown input format enum value")?;
    Ok(match format {
        pb::model_input::Format::None => Layout::Unspecified,
        pb::model_input::Format::Nchw => Layout::ChannelFirst,
        pb::model_input::Format::Nhwc => Layout::ChannelLast,
    })
}

pub(crate) fn check_request_status(status: Option<&pb::RequestStatus>) -> Result<()> {
    // Older servers leave request_status unset on success.
    let Some(status) = status else {
        return Ok(());
    };
    match pb::RequestStatusCode::try_from(status.code) {
        Ok(pb::RequestStatusCode::Success) => Ok(()),
        Ok(code) => bail!(
            "server {} returned {}: {}",
            status.server_id,
            code.as_str_name(),
            status.msg
        ),
        Err(_) => bail!("server returned unknown status code {}", status.code),
    }
}
