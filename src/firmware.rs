//! Arduino sketch generation.
//!
//! Renders a loaded basis matrix and its identifier into a self-contained
//! Arduino source fragment. The device stores the matrix in flash (PROGMEM)
//! because it does not fit in RAM, embeds the identifier so the host side
//! can verify which basis is burned in, and exposes a fixed `init_basis`
//! routine that reports the array dimensions back to the surrounding sketch
//! at runtime.
//!
//! Rendering is a pure function: identical `(matrix, id)` inputs produce
//! byte-identical output, so generated sketches diff cleanly and builds are
//! reproducible. Writing the result to disk is the caller's job (see
//! `Session::export_firmware`).

use tracing::debug;

use crate::basis::{BasisId, BasisMatrix};
use crate::error::{AppResult, CsError};

/// Quantizes every cell to `i16`, row-major.
///
/// Values are rounded to the nearest integer; anything outside the signed
/// 16-bit range after rounding is a [`CsError::Range`] error rather than a
/// silent clamp. Callers pre-scale the basis so no rescaling happens on the
/// device.
fn quantize(matrix: &BasisMatrix) -> AppResult<Vec<i16>> {
    let mut out = Vec::with_capacity(matrix.rows() * matrix.cols());
    for (i, row) in matrix.iter_rows().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let rounded = value.round();
            if rounded < f64::from(i16::MIN) || rounded > f64::from(i16::MAX) {
                return Err(CsError::Range {
                    row: i + 1,
                    col: j + 1,
                    value,
                });
            }
            out.push(rounded as i16);
        }
    }
    Ok(out)
}

/// Renders the basis matrix and its identifier as Arduino source text.
///
/// The output contains, in order: the `avr/pgmspace.h` include enabling
/// flash placement, the identifier as a string constant, the quantized
/// matrix as a `const PROGMEM int16_t` array sized exactly
/// `rows × cols`, and the `init_basis` size-introspection routine.
pub fn render_sketch(matrix: &BasisMatrix, id: BasisId) -> AppResult<String> {
    let quantized = quantize(matrix)?;
    let rows = matrix.rows();
    let cols = matrix.cols();

    let mut array = String::new();
    for (i, row) in quantized.chunks_exact(cols).enumerate() {
        if i > 0 {
            array.push_str("},\n{");
        }
        for (j, value) in row.iter().enumerate() {
            if j > 0 {
                array.push(',');
            }
            array.push_str(&value.to_string());
        }
    }

    let mut sketch = String::new();
    sketch.push_str("#include <avr/pgmspace.h>\n");
    sketch.push_str(&format!("char basis_id[] = \"{id}\";\n"));
    sketch.push_str("int b_nelements; // populated at runtime by init_basis\n");
    sketch.push_str("int b_nvalues;\n");
    sketch.push('\n');
    sketch.push_str("// The matrix does not fit in RAM; PROGMEM keeps it in flash and\n");
    sketch.push_str("// pgm_read_word fetches entries at runtime. Values are pre-scaled so\n");
    sketch.push_str("// they go straight to the analog output.\n");
    sketch.push_str(&format!(
        "const PROGMEM int16_t basis[{rows}][{cols}] = {{{{{array}}}}};\n"
    ));
    sketch.push('\n');
    sketch.push_str("// Report the matrix dimensions back to the calling sketch.\n");
    sketch.push_str("int init_basis(int &b_nelements, int &b_nvalues) {\n");
    sketch.push_str("  b_nvalues = sizeof(basis[0]) / sizeof(basis[0][0]);\n");
    sketch.push_str("  b_nelements = sizeof(basis) / b_nvalues / sizeof(basis[0][0]);\n");
    sketch.push_str("  return 1;\n");
    sketch.push_str("}\n");

    debug!(%id, rows, cols, "rendered firmware sketch");
    Ok(sketch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> BasisMatrix {
        BasisMatrix::from_rows(rows).unwrap()
    }

    /// Strips all whitespace so layout differences don't obscure content.
    fn flatten(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_known_matrix_and_id() {
        let m = matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let sketch = render_sketch(&m, BasisId::from_raw(42)).unwrap();
        assert!(sketch.contains("char basis_id[] = \"42\";"));
        assert!(flatten(&sketch).contains("{{1,2},{3,4}}"));
    }

    #[test]
    fn test_declared_dimensions_match_matrix() {
        let m = matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let sketch = render_sketch(&m, m.id()).unwrap();
        assert!(sketch.contains("const PROGMEM int16_t basis[2][3]"));
    }

    #[test]
    fn test_single_element_matrix() {
        let m = matrix(vec![vec![5.0]]);
        let sketch = render_sketch(&m, m.id()).unwrap();
        assert!(flatten(&sketch).contains("basis[1][1]={{5}};"));
    }

    #[test]
    fn test_rendering_is_pure() {
        let m = matrix(vec![vec![10.0, -20.0], vec![30.0, -40.0]]);
        let id = m.id();
        assert_eq!(
            render_sketch(&m, id).unwrap(),
            render_sketch(&m, id).unwrap()
        );
    }

    #[test]
    fn test_int16_boundaries_succeed() {
        let m = matrix(vec![vec![32767.0, -32768.0]]);
        let sketch = render_sketch(&m, m.id()).unwrap();
        assert!(flatten(&sketch).contains("{{32767,-32768}}"));
    }

    #[test]
    fn test_value_above_range_fails() {
        let m = matrix(vec![vec![32768.0]]);
        let err = render_sketch(&m, m.id());
        assert!(matches!(
            err,
            Err(CsError::Range {
                row: 1,
                col: 1,
                value
            }) if value == 32768.0
        ));
    }

    #[test]
    fn test_value_below_range_fails() {
        let m = matrix(vec![vec![0.0, -32769.0]]);
        let err = render_sketch(&m, m.id());
        assert!(matches!(err, Err(CsError::Range { row: 1, col: 2, .. })));
    }

    #[test]
    fn test_fractional_values_round() {
        let m = matrix(vec![vec![0.6, -1.4]]);
        let sketch = render_sketch(&m, m.id()).unwrap();
        assert!(flatten(&sketch).contains("{{1,-1}}"));
    }

    #[test]
    fn test_contains_size_routine() {
        let m = matrix(vec![vec![1.0]]);
        let sketch = render_sketch(&m, m.id()).unwrap();
        assert!(sketch.contains("int init_basis(int &b_nelements, int &b_nvalues)"));
        assert!(sketch.contains("return 1;"));
        assert!(sketch.contains("#include <avr/pgmspace.h>"));
    }
}
