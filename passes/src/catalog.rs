//! Port and option reflection for the standard pass types.
//!
//! Only the wiring surface is described here. Pass execution belongs to the
//! host.

use redlilium_graph::PassReflection;

use crate::color_restir;

/// Names of every pass type in the catalog.
pub const PASS_TYPES: [&str; 9] = [
    "GBufferRT",
    "GBufferRaster",
    "ColorReSTIR",
    "AccumulatePass",
    "ToneMapper",
    "SVGFPass",
    "NRD",
    "ModulateIllumination",
    "FileIO",
];

/// G-buffer channels shared by both G-buffer passes.
const GBUFFER_CHANNELS: [(&str, &str); 8] = [
    ("posW", "World-space position"),
    ("normW", "World-space shading normal"),
    ("tangentW", "World-space shading tangent"),
    ("faceNormalW", "Face normal in world space"),
    ("texC", "Texture coordinates"),
    ("texGrads", "Texture gradients"),
    ("mvec", "Motion vector"),
    ("mtlData", "Material data"),
];

/// Extra channels shared by both G-buffer passes.
const GBUFFER_EXTRA_CHANNELS: [(&str, &str); 10] = [
    ("vbuffer", "Visibility buffer in packed format"),
    ("depth", "Depth buffer (NDC)"),
    ("linearZ", "Linear Z and slope"),
    ("mvecW", "World-space motion vector"),
    ("normWRoughnessMaterialID", "Guide normal, roughness and material ID"),
    ("guideNormalW", "Guide normal in world space"),
    ("diffuseOpacity", "Diffuse reflection albedo and opacity"),
    ("specRough", "Specular reflectance and roughness"),
    ("emissive", "Emissive color"),
    ("viewW", "View direction in world space"),
];

const GBUFFER_PROPERTIES: [&str; 7] = [
    "outputSize",
    "samplePattern",
    "sampleCount",
    "useAlphaTest",
    "adjustShadingNormals",
    "forceCullMode",
    "cull",
];

fn gbuffer_outputs(reflection: PassReflection) -> PassReflection {
    GBUFFER_CHANNELS
        .iter()
        .chain(GBUFFER_EXTRA_CHANNELS.iter())
        .fold(reflection, |r, (name, desc)| r.with_output(*name, *desc))
        .with_properties(GBUFFER_PROPERTIES)
}

pub fn gbuffer_rt() -> PassReflection {
    gbuffer_outputs(PassReflection::new("GBufferRT")).with_properties([
        "texLOD",
        "useTraceRayInline",
        "useDOF",
    ])
}

pub fn gbuffer_raster() -> PassReflection {
    gbuffer_outputs(PassReflection::new("GBufferRaster"))
        .with_output("pnFwidth", "Position and normal filter width")
}

pub fn color_restir() -> PassReflection {
    PassReflection::new(color_restir::PASS_TYPE)
        .with_input("vbuffer", "Visibility buffer in packed format")
        .with_input("mvec", "Motion vectors")
        .with_input("guideNormalW", "Guide normal in world space")
        .with_input("linearZ", "Linear Z and slope")
        .with_input("posW", "World-space position")
        .with_optional_input("viewW", "World-space view direction")
        .with_output("color", "Output color (sum of direct and indirect)")
        .with_output("albedo", "Sum of diffuse and specular reflectance")
        .with_output("colorHit", "Output color with hit distance")
        .with_output("delta", "Delta reflection radiance")
        .with_properties(color_restir::PROPERTIES)
}

pub fn accumulate_pass() -> PassReflection {
    PassReflection::new("AccumulatePass")
        .with_input("input", "Input data to be temporally accumulated")
        .with_output("output", "Output data that is temporally accumulated")
        .with_properties([
            "enabled",
            "outputSize",
            "autoReset",
            "precisionMode",
            "maxFrameCount",
            "overflowMode",
        ])
}

pub fn tone_mapper() -> PassReflection {
    PassReflection::new("ToneMapper")
        .with_input("src", "Source texture")
        .with_output("dst", "Tone-mapped output texture")
        .with_properties([
            "outputSize",
            "useSceneMetadata",
            "exposureCompensation",
            "autoExposure",
            "filmSpeed",
            "whiteBalance",
            "whitePoint",
            "operator",
            "clamp",
            "whiteMaxLuminance",
            "whiteScale",
            "fNumber",
            "shutter",
            "exposureMode",
        ])
}

pub fn svgf_pass() -> PassReflection {
    PassReflection::new("SVGFPass")
        .with_input("Albedo", "Albedo")
        .with_input("Color", "Noisy color")
        .with_input("Emission", "Emission")
        .with_input("WorldPosition", "World-space position")
        .with_input("WorldNormal", "World-space normal")
        .with_input("PositionNormalFwidth", "Position and normal filter width")
        .with_input("LinearZ", "Linear Z and slope")
        .with_input("MotionVec", "Motion vectors")
        .with_output("Filtered image", "Filtered image")
        .with_properties([
            "Enabled",
            "Iterations",
            "FeedbackTap",
            "VarianceEpsilon",
            "PhiColor",
            "PhiNormal",
            "Alpha",
            "MomentsAlpha",
        ])
}

pub fn nrd() -> PassReflection {
    PassReflection::new("NRD")
        .with_input("diffuseRadianceHitDist", "Diffuse radiance and hit distance")
        .with_input("specularRadianceHitDist", "Specular radiance and hit distance")
        .with_input("viewZ", "View-space Z")
        .with_input("normWRoughnessMaterialID", "World normal, roughness and material ID")
        .with_input("mvec", "Motion vectors")
        .with_optional_input("deltaPrimaryPosW", "Delta primary world position")
        .with_optional_input("deltaSecondaryPosW", "Delta secondary world position")
        .with_output("filteredDiffuseRadianceHitDist", "Filtered diffuse radiance and hit distance")
        .with_output("filteredSpecularRadianceHitDist", "Filtered specular radiance and hit distance")
        .with_output("reflectionMotionVectors", "Reflection motion vectors in screen space")
        .with_output("deltaMotionVectors", "Delta motion vectors in screen space")
        .with_properties([
            "enabled",
            "method",
            "outputSize",
            "worldSpaceMotion",
            "disocclusionThreshold",
            "maxIntensity",
            "diffusePrepassBlurRadius",
            "specularPrepassBlurRadius",
            "diffuseMaxAccumulatedFrameNum",
            "specularMaxAccumulatedFrameNum",
            "diffuseMaxFastAccumulatedFrameNum",
            "specularMaxFastAccumulatedFrameNum",
            "diffusePhiLuminance",
            "specularPhiLuminance",
            "diffuseLobeAngleFraction",
            "specularLobeAngleFraction",
            "roughnessFraction",
            "diffuseHistoryRejectionNormalThreshold",
            "specularVarianceBoost",
            "specularLobeAngleSlack",
            "disocclusionFixEdgeStoppingNormalPower",
            "disocclusionFixMaxRadius",
            "disocclusionFixNumFramesToFix",
            "historyClampingColorBoxSigmaScale",
            "spatialVarianceEstimationHistoryThreshold",
            "atrousIterationNum",
            "minLuminanceWeight",
            "depthThreshold",
            "luminanceEdgeStoppingRelaxation",
            "normalEdgeStoppingRelaxation",
            "roughnessEdgeStoppingRelaxation",
            "enableAntiFirefly",
            "enableReprojectionTestSkippingWithoutMotion",
            "enableSpecularVirtualHistoryClamping",
            "enableRoughnessEdgeStopping",
            "enableMaterialTestForDiffuse",
            "enableMaterialTestForSpecular",
        ])
}

/// Every input is optional; only the bound terms contribute to the output.
pub fn modulate_illumination() -> PassReflection {
    const TERMS: [(&str, &str); 12] = [
        ("emission", "useEmission"),
        ("diffuseReflectance", "useDiffuseReflectance"),
        ("diffuseRadiance", "useDiffuseRadiance"),
        ("specularReflectance", "useSpecularReflectance"),
        ("specularRadiance", "useSpecularRadiance"),
        ("deltaReflectionEmission", "useDeltaReflectionEmission"),
        ("deltaReflectionReflectance", "useDeltaReflectionReflectance"),
        ("deltaReflectionRadiance", "useDeltaReflectionRadiance"),
        ("deltaTransmissionEmission", "useDeltaTransmissionEmission"),
        ("deltaTransmissionReflectance", "useDeltaTransmissionReflectance"),
        ("deltaTransmissionRadiance", "useDeltaTransmissionRadiance"),
        ("residualRadiance", "useResidualRadiance"),
    ];

    TERMS
        .iter()
        .fold(PassReflection::new("ModulateIllumination"), |r, (port, _)| {
            r.with_optional_input(*port, "")
        })
        .with_output("output", "Modulated illumination")
        .with_properties(TERMS.iter().map(|(_, property)| *property))
        .with_properties(["outputSize"])
}

/// `src` is a pass-through port: bound as input and read as output.
pub fn file_io() -> PassReflection {
    PassReflection::new("FileIO")
        .with_input("src", "Texture to write")
        .with_output("src", "Texture as written")
}

/// All catalog entries, in [`PASS_TYPES`] order.
pub fn standard_passes() -> Vec<PassReflection> {
    vec![
        gbuffer_rt(),
        gbuffer_raster(),
        color_restir(),
        accumulate_pass(),
        tone_mapper(),
        svgf_pass(),
        nrd(),
        modulate_illumination(),
        file_io(),
    ]
}

/// Catalog entry for `pass_type`.
pub fn reflection(pass_type: &str) -> Option<PassReflection> {
    standard_passes()
        .into_iter()
        .find(|r| r.pass_type() == pass_type)
}
