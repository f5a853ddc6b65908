//! OSC argument conversion helpers

use rosc::OscType;

/// Values accepted by [`OscSender::send_message`](super::OscSender::send_message):
/// a single integer, float or string, or a homogeneous list of integers or
/// floats.
pub trait IntoOscArgs {
    fn into_osc_args(self) -> Vec<OscType>;
}

impl IntoOscArgs for i32 {
    fn into_osc_args(self) -> Vec<OscType> {
        vec![OscType::Int(self)]
    }
}

impl IntoOscArgs for f32 {
    fn into_osc_args(self) -> Vec<OscType> {
        vec![OscType::Float(self)]
    }
}

impl IntoOscArgs for &str {
    fn into_osc_args(self) -> Vec<OscType> {
        vec![OscType::String(self.to_string())]
    }
}

impl IntoOscArgs for String {
    fn into_osc_args(self) -> Vec<OscType> {
        vec![OscType::String(self)]
    }
}

impl IntoOscArgs for &[i32] {
    fn into_osc_args(self) -> Vec<OscType> {
        self.iter().copied().map(OscType::Int).collect()
    }
}

impl IntoOscArgs for &[f32] {
    fn into_osc_args(self) -> Vec<OscType> {
        self.iter().copied().map(OscType::Float).collect()
    }
}

impl IntoOscArgs for Vec<i32> {
    fn into_osc_args(self) -> Vec<OscType> {
        self.into_iter().map(OscType::Int).collect()
    }
}

impl IntoOscArgs for Vec<f32> {
    fn into_osc_args(self) -> Vec<OscType> {
        self.into_iter().map(OscType::Float).collect()
    }
}

/// Channel values as an integer list
pub fn channels_to_osc(channels: &[u8]) -> Vec<OscType> {
    channels.iter().map(|&v| OscType::Int(i32::from(v))).collect()
}

/// Type-tag string for a list of arguments, e.g. `",iif"`
pub fn type_tags(args: &[OscType]) -> String {
    let mut tags = String::with_capacity(args.len() + 1);
    tags.push(',');
    for arg in args {
        tags.push(match arg {
            OscType::Int(_) => 'i',
            OscType::Float(_) => 'f',
            OscType::String(_) => 's',
            OscType::Long(_) => 'h',
            OscType::Double(_) => 'd',
            OscType::Bool(true) => 'T',
            OscType::Bool(false) => 'F',
            _ => '?',
        });
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_args() {
        assert_eq!(42i32.into_osc_args(), vec![OscType::Int(42)]);
        assert_eq!(0.5f32.into_osc_args(), vec![OscType::Float(0.5)]);
        assert_eq!(
            "Warm".into_osc_args(),
            vec![OscType::String("Warm".to_string())]
        );
    }

    #[test]
    fn test_list_args() {
        let ints: &[i32] = &[1, 2, 3];
        assert_eq!(type_tags(&ints.into_osc_args()), ",iii");
        assert_eq!(type_tags(&vec![0.1f32, 0.2].into_osc_args()), ",ff");
        assert_eq!(type_tags(&[]), ",");
    }

    #[test]
    fn test_channels_to_osc() {
        assert_eq!(
            channels_to_osc(&[0, 255]),
            vec![OscType::Int(0), OscType::Int(255)]
        );
    }
}
