//! Constant tables: quantizer lookups, default probabilities, scans, and
//! the coefficient token model.
//!
//! Values are the normative defaults of the VP9 bitstream format. They are
//! plain data; the code that consumes them lives in `probability`, `tile`
//! and `residual`.

// ─── Quantizer lookups ───────────────────────────────────────────────────────

/// DC dequantizer step, indexed by `[(bit_depth - 8) >> 1][qindex]`.
pub const DC_QLOOKUP: [[i32; 256]; 3] = [
    [
            4,     8,     8,     9,    10,    11,    12,    12,    13,    14,    15,    16,
           17,    18,    19,    19,    20,    21,    22,    23,    24,    25,    26,    26,
           27,    28,    29,    30,    31,    32,    32,    33,    34,    35,    36,    37,
           38,    38,    39,    40,    41,    42,    43,    43,    44,    45,    46,    47,
           48,    48,    49,    50,    51,    52,    53,    53,    54,    55,    56,    57,
           57,    58,    59,    60,    61,    62,    62,    63,    64,    65,    66,    66,
           67,    68,    69,    70,    70,    71,    72,    73,    74,    74,    75,    76,
           77,    78,    78,    79,    80,    81,    81,    82,    83,    84,    85,    85,
           87,    88,    90,    92,    93,    95,    96,    98,    99,   101,   102,   104,
          105,   107,   108,   110,   111,   113,   114,   116,   117,   118,   120,   121,
          123,   125,   127,   129,   131,   134,   136,   138,   140,   142,   144,   146,
          148,   150,   152,   154,   156,   158,   161,   164,   166,   169,   172,   174,
          177,   180,   182,   185,   187,   190,   192,   195,   199,   202,   205,   208,
          211,   214,   217,   220,   223,   226,   230,   233,   237,   240,   243,   247,
          250,   253,   257,   261,   265,   269,   272,   276,   280,   284,   288,   292,
          296,   300,   304,   309,   313,   317,   322,   326,   330,   335,   340,   344,
          349,   354,   359,   364,   369,   374,   379,   384,   389,   395,   400,   406,
          411,   417,   423,   429,   435,   441,   447,   454,   461,   467,   475,   482,
          489,   497,   505,   513,   522,   530,   539,   549,   559,   569,   579,   590,
          602,   614,   626,   640,   654,   668,   684,   700,   717,   736,   755,   775,
          796,   819,   843,   869,   896,   925,   955,   988,  1022,  1058,  1098,  1139,
         1184,  1232,  1282,  1336,
    ],
    [
            4,     9,    10,    13,    15,    17,    20,    22,    25,    28,    31,    34,
           37,    40,    43,    47,    50,    53,    57,    60,    64,    68,    71,    75,
           78,    82,    86,    90,    93,    97,   101,   105,   109,   113,   116,   120,
          124,   128,   132,   136,   140,   143,   147,   151,   155,   159,   163,   166,
          170,   174,   178,   182,   185,   189,   193,   197,   200,   204,   208,   212,
          215,   219,   223,   226,   230,   233,   237,   241,   244,   248,   251,   255,
          259,   262,   266,   269,   273,   276,   280,   283,   287,   290,   293,   297,
          300,   304,   307,   310,   314,   317,   321,   324,   327,   331,   334,   337,
          343,   350,   356,   362,   369,   375,   381,   387,   394,   400,   406,   412,
          418,   424,   430,   436,   442,   448,   454,   460,   466,   472,   478,   484,
          490,   499,   507,   516,   525,   533,   542,   550,   559,   567,   576,   584,
          592,   601,   609,   617,   625,   634,   644,   655,   666,   676,   687,   698,
          708,   718,   729,   739,   749,   759,   770,   782,   795,   807,   819,   831,
          844,   856,   868,   880,   891,   906,   920,   933,   947,   961,   975,   988,
         1001,  1015,  1030,  1045,  1061,  1076,  1090,  1105,  1120,  1137,  1153,  1170,
         1186,  1202,  1218,  1236,  1253,  1271,  1288,  1306,  1323,  1342,  1361,  1379,
         1398,  1416,  1436,  1456,  1476,  1496,  1516,  1537,  1559,  1580,  1601,  1624,
         1647,  1670,  1692,  1717,  1741,  1766,  1791,  1817,  1844,  1871,  1900,  1929,
         1958,  1990,  2021,  2054,  2088,  2123,  2159,  2197,  2236,  2276,  2319,  2363,
         2410,  2458,  2508,  2561,  2616,  2675,  2737,  2802,  2871,  2944,  3020,  3102,
         3188,  3280,  3375,  3478,  3586,  3702,  3823,  3953,  4089,  4236,  4394,  4559,
         4737,  4929,  5130,  5347,
    ],
    [
            4,    12,    18,    25,    33,    41,    50,    60,    70,    80,    91,   103,
          115,   127,   140,   153,   166,   180,   194,   208,   222,   237,   251,   266,
          281,   296,   312,   327,   343,   358,   374,   390,   405,   421,   437,   453,
          469,   484,   500,   516,   532,   548,   564,   580,   596,   611,   627,   643,
          659,   674,   690,   706,   721,   737,   752,   768,   783,   798,   814,   829,
          844,   859,   874,   889,   904,   919,   934,   949,   964,   978,   993,  1008,
         1022,  1037,  1051,  1065,  1080,  1094,  1108,  1122,  1136,  1151,  1165,  1179,
         1192,  1206,  1220,  1234,  1248,  1261,  1275,  1288,  1302,  1315,  1329,  1342,
         1368,  1393,  1419,  1444,  1469,  1494,  1519,  1544,  1569,  1594,  1618,  1643,
         1668,  1692,  1717,  1741,  1765,  1789,  1814,  1838,  1862,  1885,  1909,  1933,
         1957,  1992,  2027,  2061,  2096,  2130,  2165,  2199,  2233,  2267,  2300,  2334,
         2367,  2400,  2434,  2467,  2499,  2532,  2575,  2618,  2661,  2704,  2746,  2788,
         2830,  2872,  2913,  2954,  2995,  3036,  3076,  3127,  3177,  3226,  3275,  3324,
         3373,  3421,  3469,  3517,  3565,  3621,  3677,  3733,  3788,  3843,  3897,  3951,
         4005,  4058,  4119,  4181,  4241,  4301,  4361,  4420,  4479,  4546,  4612,  4677,
         4742,  4807,  4871,  4942,  5013,  5083,  5153,  5222,  5291,  5367,  5442,  5517,
         5591,  5665,  5745,  5825,  5905,  5984,  6063,  6149,  6234,  6319,  6404,  6495,
         6587,  6678,  6769,  6867,  6966,  7064,  7163,  7269,  7376,  7483,  7599,  7715,
         7832,  7958,  8085,  8214,  8352,  8492,  8635,  8788,  8945,  9104,  9275,  9450,
         9639,  9832, 10031, 10245, 10465, 10702, 10946, 11210, 11482, 11776, 12081, 12409,
        12750, 13118, 13501, 13913, 14343, 14807, 15290, 15812, 16356, 16943, 17575, 18237,
        18949, 19718, 20521, 21387,
    ],
];

/// AC dequantizer step, indexed by `[(bit_depth - 8) >> 1][qindex]`.
pub const AC_QLOOKUP: [[i32; 256]; 3] = [
    [
            4,     8,     9,    10,    11,    12,    13,    14,    15,    16,    17,    18,
           19,    20,    21,    22,    23,    24,    25,    26,    27,    28,    29,    30,
           31,    32,    33,    34,    35,    36,    37,    38,    39,    40,    41,    42,
           43,    44,    45,    46,    47,    48,    49,    50,    51,    52,    53,    54,
           55,    56,    57,    58,    59,    60,    61,    62,    63,    64,    65,    66,
           67,    68,    69,    70,    71,    72,    73,    74,    75,    76,    77,    78,
           79,    80,    81,    82,    83,    84,    85,    86,    87,    88,    89,    90,
           91,    92,    93,    94,    95,    96,    97,    98,    99,   100,   101,   102,
          104,   106,   108,   110,   112,   114,   116,   118,   120,   122,   124,   126,
          128,   130,   132,   134,   136,   138,   140,   142,   144,   146,   148,   150,
          152,   155,   158,   161,   164,   167,   170,   173,   176,   179,   182,   185,
          188,   191,   194,   197,   200,   203,   207,   211,   215,   219,   223,   227,
          231,   235,   239,   243,   247,   251,   255,   260,   265,   270,   275,   280,
          285,   290,   295,   300,   305,   311,   317,   323,   329,   335,   341,   347,
          353,   359,   366,   373,   380,   387,   394,   401,   408,   416,   424,   432,
          440,   448,   456,   465,   474,   483,   492,   501,   510,   520,   530,   540,
          550,   560,   571,   582,   593,   604,   615,   627,   639,   651,   663,   676,
          689,   702,   715,   729,   743,   757,   771,   786,   801,   816,   832,   848,
          864,   881,   898,   915,   933,   951,   969,   988,  1007,  1026,  1046,  1066,
         1087,  1108,  1129,  1151,  1173,  1196,  1219,  1243,  1267,  1292,  1317,  1343,
         1369,  1396,  1423,  1451,  1479,  1508,  1537,  1567,  1597,  1628,  1660,  1692,
         1725,  1759,  1793,  1828,
    ],
    [
            4,     9,    11,    13,    16,    18,    21,    24,    27,    30,    33,    37,
           40,    44,    48,    51,    55,    59,    63,    67,    71,    75,    79,    83,
           88,    92,    96,   100,   105,   109,   114,   118,   122,   127,   131,   136,
          140,   145,   149,   154,   158,   163,   168,   172,   177,   181,   186,   190,
          195,   199,   204,   208,   213,   217,   222,   226,   231,   235,   240,   244,
          249,   253,   258,   262,   267,   271,   275,   280,   284,   289,   293,   297,
          302,   306,   311,   315,   319,   324,   328,   332,   337,   341,   345,   349,
          354,   358,   362,   367,   371,   375,   379,   384,   388,   392,   396,   401,
          409,   417,   425,   433,   441,   449,   458,   466,   474,   482,   490,   498,
          506,   514,   523,   531,   539,   547,   555,   563,   571,   579,   588,   596,
          604,   616,   628,   640,   652,   664,   676,   688,   700,   713,   725,   737,
          749,   761,   773,   785,   797,   809,   825,   841,   857,   873,   889,   905,
          922,   938,   954,   970,   986,  1002,  1018,  1038,  1058,  1078,  1098,  1118,
         1138,  1158,  1178,  1198,  1218,  1242,  1266,  1290,  1314,  1338,  1362,  1386,
         1411,  1435,  1463,  1491,  1519,  1547,  1575,  1603,  1631,  1663,  1695,  1727,
         1759,  1791,  1823,  1859,  1895,  1931,  1967,  2003,  2039,  2079,  2119,  2159,
         2199,  2239,  2283,  2327,  2371,  2415,  2459,  2507,  2555,  2603,  2651,  2703,
         2755,  2807,  2859,  2915,  2971,  3027,  3083,  3143,  3203,  3263,  3327,  3391,
         3455,  3523,  3591,  3659,  3731,  3803,  3876,  3952,  4028,  4104,  4184,  4264,
         4348,  4432,  4516,  4604,  4692,  4784,  4876,  4972,  5068,  5168,  5268,  5372,
         5476,  5584,  5692,  5804,  5916,  6032,  6148,  6268,  6388,  6512,  6640,  6768,
         6900,  7036,  7172,  7312,
    ],
    [
            4,    13,    19,    27,    35,    44,    54,    64,    75,    87,    99,   112,
          126,   139,   154,   168,   183,   199,   214,   230,   247,   263,   280,   297,
          314,   331,   349,   366,   384,   402,   420,   438,   456,   475,   493,   511,
          530,   548,   567,   586,   604,   623,   642,   660,   679,   698,   716,   735,
          753,   772,   791,   809,   828,   846,   865,   884,   902,   920,   939,   957,
          976,   994,  1012,  1030,  1049,  1067,  1085,  1103,  1121,  1139,  1157,  1175,
         1193,  1211,  1229,  1246,  1264,  1282,  1299,  1317,  1335,  1352,  1370,  1387,
         1405,  1422,  1440,  1457,  1474,  1491,  1509,  1526,  1543,  1560,  1577,  1595,
         1627,  1660,  1693,  1725,  1758,  1791,  1824,  1856,  1889,  1922,  1954,  1987,
         2020,  2052,  2085,  2118,  2150,  2183,  2216,  2248,  2281,  2313,  2346,  2378,
         2411,  2459,  2508,  2556,  2605,  2653,  2701,  2750,  2798,  2847,  2895,  2943,
         2992,  3040,  3088,  3137,  3185,  3234,  3298,  3362,  3426,  3491,  3555,  3619,
         3684,  3748,  3812,  3876,  3941,  4005,  4069,  4149,  4230,  4310,  4390,  4470,
         4550,  4631,  4711,  4791,  4871,  4967,  5064,  5160,  5256,  5352,  5448,  5544,
         5641,  5737,  5849,  5961,  6073,  6185,  6297,  6410,  6522,  6650,  6778,  6906,
         7034,  7162,  7290,  7435,  7579,  7723,  7867,  8011,  8155,  8315,  8475,  8635,
         8795,  8956,  9132,  9308,  9484,  9660,  9836, 10028, 10220, 10412, 10604, 10812,
        11020, 11228, 11437, 11661, 11885, 12109, 12333, 12573, 12813, 13053, 13309, 13565,
        13821, 14093, 14365, 14637, 14925, 15213, 15502, 15806, 16110, 16414, 16734, 17054,
        17390, 17726, 18062, 18414, 18766, 19134, 19502, 19886, 20270, 20670, 21070, 21486,
        21902, 22334, 22766, 23214, 23662, 24126, 24590, 25070, 25551, 26047, 26559, 27071,
        27599, 28143, 28687, 29247,
    ],
];

// ─── Coefficient probabilities ───────────────────────────────────────────────

/// `[plane_type][ref][band][ctx][node]`. Band 0 only uses three contexts;
/// the remaining slots are padding and never read.
pub type CoefProbs = [[[[[u8; 3]; 6]; 6]; 2]; 2];

pub const DEFAULT_COEF_PROBS: [CoefProbs; 4] = [
    [
        [
            [
                [[195,  29, 183], [ 84,  49, 136], [  8,  42,  71], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 31, 107, 169], [ 35,  99, 159], [ 17,  82, 140], [  8,  66, 114], [  2,  44,  76], [  1,  19,  32]],
                [[ 40, 132, 201], [ 29, 114, 187], [ 13,  91, 157], [  7,  75, 127], [  3,  58,  95], [  1,  28,  47]],
                [[ 69, 142, 221], [ 42, 122, 201], [ 15,  91, 159], [  6,  67, 121], [  1,  42,  77], [  1,  17,  31]],
                [[102, 148, 228], [ 67, 117, 204], [ 17,  82, 154], [  6,  59, 114], [  2,  39,  75], [  1,  15,  29]],
                [[156,  57, 233], [119,  57, 212], [ 58,  48, 163], [ 29,  40, 124], [ 12,  30,  81], [  3,  12,  31]],
            ],
            [
                [[191, 107, 226], [124, 117, 204], [ 25,  99, 155], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 29, 148, 210], [ 37, 126, 194], [  8,  93, 157], [  2,  68, 118], [  1,  39,  69], [  1,  17,  33]],
                [[ 41, 151, 213], [ 27, 123, 193], [  3,  82, 144], [  1,  58, 105], [  1,  32,  60], [  1,  13,  26]],
                [[ 59, 159, 220], [ 23, 126, 198], [  4,  88, 151], [  1,  66, 114], [  1,  38,  71], [  1,  18,  34]],
                [[114, 136, 232], [ 51, 114, 207], [ 11,  83, 155], [  3,  56, 105], [  1,  33,  65], [  1,  17,  34]],
                [[149,  65, 234], [121,  57, 215], [ 61,  49, 166], [ 28,  36, 114], [ 12,  25,  76], [  3,  16,  42]],
            ],
        ],
        [
            [
                [[214,  49, 220], [132,  63, 188], [ 42,  65, 137], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 85, 137, 221], [104, 131, 216], [ 49, 111, 192], [ 21,  87, 155], [  2,  49,  87], [  1,  16,  28]],
                [[ 89, 163, 230], [ 90, 137, 220], [ 29, 100, 183], [ 10,  70, 135], [  2,  42,  81], [  1,  17,  33]],
                [[108, 167, 237], [ 55, 133, 222], [ 15,  97, 179], [  4,  72, 135], [  1,  45,  85], [  1,  19,  38]],
                [[124, 146, 240], [ 66, 124, 224], [ 17,  88, 175], [  4,  58, 122], [  1,  36,  75], [  1,  18,  37]],
                [[141,  79, 241], [126,  70, 227], [ 66,  58, 182], [ 30,  44, 136], [ 12,  34,  96], [  2,  20,  47]],
            ],
            [
                [[229,  99, 249], [143, 111, 235], [ 46, 109, 192], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 82, 158, 236], [ 94, 146, 224], [ 25, 117, 191], [  9,  87, 149], [  3,  56,  99], [  1,  33,  57]],
                [[ 83, 167, 237], [ 68, 145, 222], [ 10, 103, 177], [  2,  72, 131], [  1,  41,  79], [  1,  20,  39]],
                [[ 99, 167, 239], [ 47, 141, 224], [ 10, 104, 178], [  2,  73, 133], [  1,  44,  85], [  1,  22,  47]],
                [[127, 145, 243], [ 71, 129, 228], [ 17,  93, 177], [  3,  61, 124], [  1,  41,  84], [  1,  21,  52]],
                [[157,  78, 244], [140,  72, 231], [ 69,  58, 184], [ 31,  44, 137], [ 14,  38, 105], [  8,  23,  61]],
            ],
        ],
    ],
    [
        [
            [
                [[125,  34, 187], [ 52,  41, 133], [  6,  31,  56], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 37, 109, 153], [ 51, 102, 147], [ 23,  87, 128], [  8,  67, 101], [  1,  41,  63], [  1,  19,  29]],
                [[ 31, 154, 185], [ 17, 127, 175], [  6,  96, 145], [  2,  73, 114], [  1,  51,  82], [  1,  28,  45]],
                [[ 23, 163, 200], [ 10, 131, 185], [  2,  93, 148], [  1,  67, 111], [  1,  41,  69], [  1,  14,  24]],
                [[ 29, 176, 217], [ 12, 145, 201], [  3, 101, 156], [  1,  69, 111], [  1,  39,  63], [  1,  14,  23]],
                [[ 57, 192, 233], [ 25, 154, 215], [  6, 109, 167], [  3,  78, 118], [  1,  48,  69], [  1,  21,  29]],
            ],
            [
                [[202, 105, 245], [108, 106, 216], [ 18,  90, 144], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 33, 172, 219], [ 64, 149, 206], [ 14, 117, 177], [  5,  90, 141], [  2,  61,  95], [  1,  37,  57]],
                [[ 33, 179, 220], [ 11, 140, 198], [  1,  89, 148], [  1,  60, 104], [  1,  33,  57], [  1,  12,  21]],
                [[ 30, 181, 221], [  8, 141, 198], [  1,  87, 145], [  1,  58, 100], [  1,  31,  55], [  1,  12,  20]],
                [[ 32, 186, 224], [  7, 142, 198], [  1,  86, 143], [  1,  58, 100], [  1,  31,  55], [  1,  12,  22]],
                [[ 57, 192, 227], [ 20, 143, 204], [  3,  96, 154], [  1,  68, 112], [  1,  42,  69], [  1,  19,  32]],
            ],
        ],
        [
            [
                [[212,  35, 215], [113,  47, 169], [ 29,  48, 105], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 74, 129, 203], [106, 120, 203], [ 49, 107, 178], [ 19,  84, 144], [  4,  50,  84], [  1,  15,  25]],
                [[ 71, 172, 217], [ 44, 141, 209], [ 15, 102, 173], [  6,  76, 133], [  2,  51,  89], [  1,  24,  42]],
                [[ 64, 185, 231], [ 31, 148, 216], [  8, 103, 175], [  3,  74, 131], [  1,  46,  81], [  1,  18,  30]],
                [[ 65, 196, 235], [ 25, 157, 221], [  5, 105, 174], [  1,  67, 120], [  1,  38,  69], [  1,  15,  30]],
                [[ 65, 204, 238], [ 30, 156, 224], [  7, 107, 177], [  2,  70, 124], [  1,  42,  73], [  1,  18,  34]],
            ],
            [
                [[225,  86, 251], [144, 104, 235], [ 42,  99, 181], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 85, 175, 239], [112, 165, 229], [ 29, 136, 200], [ 12, 103, 162], [  6,  77, 123], [  2,  53,  84]],
                [[ 75, 183, 239], [ 30, 155, 221], [  3, 106, 171], [  1,  74, 128], [  1,  44,  76], [  1,  17,  28]],
                [[ 73, 185, 240], [ 27, 159, 222], [  2, 107, 172], [  1,  75, 127], [  1,  42,  73], [  1,  17,  29]],
                [[ 62, 190, 238], [ 21, 159, 222], [  2, 107, 172], [  1,  72, 122], [  1,  40,  71], [  1,  18,  32]],
                [[ 61, 199, 240], [ 27, 161, 226], [  4, 113, 180], [  1,  76, 129], [  1,  46,  80], [  1,  23,  41]],
            ],
        ],
    ],
    [
        [
            [
                [[  7,  27, 153], [  5,  30,  95], [  1,  16,  30], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 50,  75, 127], [ 57,  75, 124], [ 27,  67, 108], [ 10,  54,  86], [  1,  33,  52], [  1,  12,  18]],
                [[ 43, 125, 151], [ 26, 108, 148], [  7,  83, 122], [  2,  59,  89], [  1,  38,  60], [  1,  17,  27]],
                [[ 23, 144, 163], [ 13, 112, 154], [  2,  75, 117], [  1,  50,  81], [  1,  31,  51], [  1,  14,  23]],
                [[ 18, 162, 185], [  6, 123, 171], [  1,  78, 125], [  1,  51,  86], [  1,  31,  54], [  1,  14,  23]],
                [[ 15, 199, 227], [  3, 150, 204], [  1,  91, 146], [  1,  55,  95], [  1,  30,  53], [  1,  11,  20]],
            ],
            [
                [[ 19,  55, 240], [ 19,  59, 196], [  3,  52, 105], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 41, 166, 207], [104, 153, 199], [ 31, 123, 181], [ 14, 101, 152], [  5,  72, 106], [  1,  36,  52]],
                [[ 35, 176, 211], [ 12, 131, 190], [  2,  88, 144], [  1,  60, 101], [  1,  36,  60], [  1,  16,  28]],
                [[ 28, 183, 213], [  8, 134, 191], [  1,  86, 142], [  1,  56,  96], [  1,  30,  53], [  1,  12,  20]],
                [[ 20, 190, 215], [  4, 135, 192], [  1,  84, 139], [  1,  53,  91], [  1,  28,  49], [  1,  11,  20]],
                [[ 13, 196, 216], [  2, 137, 192], [  1,  86, 143], [  1,  57,  99], [  1,  32,  56], [  1,  13,  24]],
            ],
        ],
        [
            [
                [[211,  29, 217], [ 96,  47, 156], [ 22,  43,  87], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 78, 120, 193], [111, 116, 186], [ 46, 102, 164], [ 15,  80, 128], [  2,  49,  76], [  1,  18,  28]],
                [[ 71, 161, 203], [ 42, 132, 192], [ 10,  98, 150], [  3,  69, 109], [  1,  44,  70], [  1,  18,  29]],
                [[ 57, 186, 211], [ 30, 140, 196], [  4,  93, 146], [  1,  62, 102], [  1,  38,  65], [  1,  16,  27]],
                [[ 47, 199, 217], [ 14, 145, 196], [  1,  88, 142], [  1,  57,  98], [  1,  36,  62], [  1,  15,  26]],
                [[ 26, 219, 229], [  5, 155, 207], [  1,  94, 151], [  1,  60, 104], [  1,  36,  62], [  1,  16,  28]],
            ],
            [
                [[233,  29, 248], [146,  47, 220], [ 43,  52, 140], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[100, 163, 232], [179, 161, 222], [ 63, 142, 204], [ 37, 113, 174], [ 26,  89, 137], [ 18,  68,  97]],
                [[ 85, 181, 230], [ 32, 146, 209], [  7, 100, 164], [  3,  71, 121], [  1,  45,  77], [  1,  18,  30]],
                [[ 65, 187, 230], [ 20, 148, 207], [  2,  97, 159], [  1,  68, 116], [  1,  40,  70], [  1,  14,  29]],
                [[ 40, 194, 227], [  8, 147, 204], [  1,  94, 155], [  1,  65, 112], [  1,  39,  66], [  1,  14,  26]],
                [[ 16, 208, 228], [  3, 151, 207], [  1,  98, 160], [  1,  67, 117], [  1,  41,  74], [  1,  17,  31]],
            ],
        ],
    ],
    [
        [
            [
                [[ 17,  38, 140], [  7,  34,  80], [  1,  17,  29], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 37,  75, 128], [ 41,  76, 128], [ 26,  66, 116], [ 12,  52,  94], [  2,  32,  55], [  1,  10,  16]],
                [[ 50, 127, 154], [ 37, 109, 152], [ 16,  82, 121], [  5,  59,  85], [  1,  35,  54], [  1,  13,  20]],
                [[ 40, 142, 167], [ 17, 110, 157], [  2,  71, 112], [  1,  44,  72], [  1,  27,  45], [  1,  11,  17]],
                [[ 30, 175, 188], [  9, 124, 169], [  1,  74, 116], [  1,  48,  78], [  1,  30,  49], [  1,  11,  18]],
                [[ 10, 222, 223], [  2, 150, 194], [  1,  83, 128], [  1,  48,  79], [  1,  27,  45], [  1,  11,  17]],
            ],
            [
                [[ 36,  41, 235], [ 29,  36, 193], [ 10,  27, 111], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 85, 165, 222], [177, 162, 215], [110, 135, 195], [ 57, 113, 168], [ 23,  83, 120], [ 10,  49,  61]],
                [[ 85, 190, 223], [ 36, 139, 200], [  5,  90, 146], [  1,  60, 103], [  1,  38,  65], [  1,  18,  30]],
                [[ 72, 202, 223], [ 23, 141, 199], [  2,  86, 140], [  1,  56,  97], [  1,  36,  61], [  1,  16,  27]],
                [[ 55, 218, 225], [ 13, 145, 200], [  1,  86, 141], [  1,  57,  99], [  1,  35,  61], [  1,  13,  22]],
                [[ 15, 235, 212], [  1, 132, 184], [  1,  84, 139], [  1,  57,  97], [  1,  34,  56], [  1,  14,  23]],
            ],
        ],
        [
            [
                [[181,  21, 201], [ 61,  37, 123], [ 10,  38,  71], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[ 47, 106, 172], [ 95, 104, 173], [ 42,  93, 159], [ 18,  77, 131], [  4,  50,  81], [  1,  17,  23]],
                [[ 62, 147, 199], [ 44, 130, 189], [ 28, 102, 154], [ 18,  75, 115], [  2,  44,  65], [  1,  12,  19]],
                [[ 55, 153, 210], [ 24, 130, 194], [  3,  93, 146], [  1,  61,  97], [  1,  31,  50], [  1,  10,  16]],
                [[ 49, 186, 223], [ 17, 148, 204], [  1,  96, 142], [  1,  53,  83], [  1,  26,  44], [  1,  11,  17]],
                [[ 13, 217, 212], [  2, 136, 180], [  1,  78, 124], [  1,  50,  83], [  1,  29,  49], [  1,  14,  23]],
            ],
            [
                [[197,  13, 247], [ 82,  17, 222], [ 25,  17, 162], [128, 128, 128], [128, 128, 128], [128, 128, 128]],
                [[126, 186, 247], [234, 191, 243], [176, 177, 234], [104, 158, 220], [ 66, 128, 186], [ 55,  90, 137]],
                [[111, 197, 242], [ 46, 158, 219], [  9, 104, 171], [  2,  65, 125], [  1,  44,  80], [  1,  17,  91]],
                [[104, 208, 245], [ 39, 168, 224], [  3, 109, 162], [  1,  79, 124], [  1,  50, 102], [  1,  43, 102]],
                [[ 84, 220, 246], [ 31, 177, 231], [  2, 115, 180], [  1,  79, 134], [  1,  55,  77], [  1,  60,  79]],
                [[ 43, 243, 240], [  8, 180, 217], [  1, 115, 166], [  1,  84, 121], [  1,  51,  67], [  1,  16,   6]],
            ],
        ],
    ],
];

/// Tail of the token tree for probabilities above node 2, one row per odd
/// probability value; even values average two neighbouring rows.
pub const PARETO_TABLE: [[u8; 8]; 128] = [
    [  3,  86, 128,   6,  86,  23,  88,  29],
    [  9,  86, 129,  17,  88,  61,  94,  76],
    [ 15,  87, 129,  28,  89,  93, 100, 110],
    [ 20,  88, 130,  38,  91, 118, 106, 136],
    [ 26,  89, 131,  48,  92, 139, 111, 156],
    [ 31,  90, 131,  58,  94, 156, 117, 171],
    [ 37,  90, 132,  66,  95, 171, 122, 184],
    [ 42,  91, 132,  75,  97, 183, 127, 194],
    [ 47,  92, 133,  83,  98, 193, 132, 202],
    [ 52,  93, 133,  90, 100, 201, 137, 208],
    [ 57,  94, 134,  98, 101, 208, 142, 214],
    [ 62,  94, 135, 105, 103, 214, 146, 218],
    [ 66,  95, 135, 111, 104, 219, 151, 222],
    [ 71,  96, 136, 117, 106, 224, 155, 225],
    [ 76,  97, 136, 123, 107, 227, 159, 228],
    [ 80,  98, 137, 129, 109, 231, 162, 231],
    [ 84,  98, 138, 134, 110, 234, 166, 233],
    [ 89,  99, 138, 140, 112, 236, 170, 235],
    [ 93, 100, 139, 145, 113, 238, 173, 236],
    [ 97, 101, 140, 149, 115, 240, 176, 238],
    [101, 102, 140, 154, 116, 242, 179, 239],
    [105, 103, 141, 158, 118, 243, 182, 240],
    [109, 104, 141, 162, 119, 244, 185, 241],
    [113, 104, 142, 166, 120, 245, 187, 242],
    [116, 105, 143, 170, 122, 246, 190, 243],
    [120, 106, 143, 173, 123, 247, 192, 244],
    [123, 107, 144, 177, 125, 248, 195, 244],
    [127, 108, 145, 180, 126, 249, 197, 245],
    [130, 109, 145, 183, 128, 249, 199, 245],
    [134, 110, 146, 186, 129, 250, 201, 246],
    [137, 111, 147, 189, 131, 251, 203, 246],
    [140, 112, 147, 192, 132, 251, 205, 247],
    [143, 113, 148, 194, 133, 251, 207, 247],
    [146, 114, 149, 197, 135, 252, 208, 248],
    [149, 115, 149, 199, 136, 252, 210, 248],
    [152, 115, 150, 201, 138, 252, 211, 248],
    [155, 116, 151, 204, 139, 253, 213, 249],
    [158, 117, 151, 206, 140, 253, 214, 249],
    [160, 118, 152, 208, 142, 253, 216, 249],
    [163, 119, 153, 210, 143, 253, 217, 249],
    [166, 120, 153, 212, 144, 254, 218, 250],
    [168, 121, 154, 213, 146, 254, 220, 250],
    [171, 122, 155, 215, 147, 254, 221, 250],
    [173, 123, 155, 217, 148, 254, 222, 250],
    [176, 124, 156, 219, 150, 254, 223, 250],
    [178, 125, 157, 220, 151, 254, 224, 251],
    [181, 126, 157, 222, 152, 254, 225, 251],
    [183, 127, 158, 224, 153, 254, 226, 251],
    [185, 128, 159, 225, 155, 255, 227, 251],
    [187, 129, 160, 227, 156, 255, 228, 251],
    [189, 130, 160, 228, 157, 255, 228, 251],
    [191, 131, 161, 230, 159, 255, 229, 251],
    [193, 132, 162, 231, 160, 255, 230, 251],
    [195, 133, 163, 232, 161, 255, 231, 251],
    [197, 134, 163, 233, 162, 255, 232, 252],
    [199, 135, 164, 234, 164, 255, 233, 252],
    [201, 136, 165, 235, 165, 255, 233, 252],
    [203, 137, 166, 236, 166, 255, 234, 252],
    [205, 138, 166, 237, 167, 255, 235, 252],
    [207, 139, 167, 238, 169, 255, 235, 252],
    [209, 140, 168, 239, 170, 255, 236, 252],
    [211, 141, 168, 240, 171, 255, 237, 252],
    [213, 142, 169, 241, 172, 255, 237, 252],
    [215, 143, 170, 242, 173, 255, 238, 252],
    [217, 144, 171, 243, 174, 255, 238, 252],
    [218, 146, 172, 243, 175, 255, 238, 252],
    [218, 147, 173, 243, 176, 255, 238, 252],
    [219, 149, 175, 244, 177, 255, 239, 252],
    [219, 150, 176, 244, 178, 255, 239, 252],
    [220, 152, 177, 244, 179, 255, 239, 252],
    [221, 154, 178, 244, 180, 255, 239, 252],
    [221, 155, 179, 244, 181, 255, 240, 252],
    [222, 157, 181, 245, 182, 255, 240, 252],
    [222, 159, 182, 245, 183, 255, 240, 252],
    [223, 160, 183, 245, 184, 255, 240, 252],
    [224, 162, 184, 245, 185, 255, 241, 253],
    [224, 163, 185, 245, 186, 255, 241, 253],
    [225, 165, 187, 245, 187, 255, 241, 253],
    [225, 167, 188, 246, 188, 255, 241, 253],
    [226, 168, 189, 246, 189, 255, 242, 253],
    [227, 170, 190, 246, 191, 255, 242, 253],
    [227, 172, 192, 246, 192, 255, 242, 253],
    [228, 173, 193, 246, 193, 255, 242, 253],
    [228, 175, 194, 247, 194, 255, 243, 253],
    [229, 176, 195, 247, 195, 255, 243, 253],
    [230, 178, 196, 247, 196, 255, 243, 253],
    [230, 180, 198, 247, 197, 255, 243, 253],
    [231, 181, 199, 247, 198, 255, 243, 253],
    [231, 183, 200, 248, 199, 255, 244, 253],
    [232, 184, 201, 248, 200, 255, 244, 253],
    [233, 186, 202, 248, 201, 255, 244, 253],
    [233, 188, 204, 248, 202, 255, 244, 253],
    [234, 189, 205, 248, 203, 255, 245, 253],
    [234, 191, 206, 249, 204, 255, 245, 253],
    [235, 193, 207, 249, 205, 255, 245, 253],
    [236, 194, 208, 249, 206, 255, 245, 253],
    [236, 196, 210, 249, 207, 255, 246, 254],
    [237, 197, 211, 249, 208, 255, 246, 254],
    [238, 199, 212, 249, 209, 255, 246, 254],
    [238, 201, 213, 250, 210, 255, 246, 254],
    [239, 202, 214, 250, 211, 255, 247, 254],
    [239, 204, 216, 250, 212, 255, 247, 254],
    [240, 206, 217, 250, 213, 255, 247, 254],
    [241, 207, 218, 250, 214, 255, 247, 254],
    [241, 209, 219, 251, 215, 255, 248, 254],
    [242, 210, 220, 251, 216, 255, 248, 254],
    [242, 212, 222, 251, 217, 255, 248, 254],
    [243, 214, 223, 251, 218, 255, 248, 254],
    [244, 215, 224, 251, 219, 255, 248, 254],
    [244, 217, 225, 252, 220, 255, 249, 254],
    [245, 218, 226, 252, 221, 255, 249, 254],
    [245, 220, 228, 252, 222, 255, 249, 254],
    [246, 222, 229, 252, 224, 255, 249, 254],
    [247, 223, 230, 252, 225, 255, 250, 254],
    [247, 225, 231, 253, 226, 255, 250, 254],
    [248, 227, 233, 253, 227, 255, 250, 254],
    [248, 228, 234, 253, 228, 255, 250, 254],
    [249, 230, 235, 253, 229, 255, 251, 255],
    [250, 231, 236, 253, 230, 255, 251, 255],
    [250, 233, 237, 253, 231, 255, 251, 255],
    [251, 235, 239, 254, 232, 255, 251, 255],
    [251, 236, 240, 254, 233, 255, 252, 255],
    [252, 238, 241, 254, 234, 255, 252, 255],
    [253, 240, 242, 254, 235, 255, 252, 255],
    [253, 241, 243, 254, 236, 255, 252, 255],
    [254, 243, 245, 255, 237, 255, 253, 255],
    [254, 244, 246, 255, 238, 255, 253, 255],
    [255, 246, 247, 255, 239, 255, 253, 255],
];

pub const COEFBAND_4X4: [u8; 16] = [0, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 5, 5, 5];

/// Bands for the first 32 positions of 8x8 and larger transforms; every later
/// position is band 5.
pub const COEFBAND_8X8PLUS: [u8; 32] = [
    0, 1, 1, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 4, 5,
    5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
];

/// Token energy used to build the context of the following coefficients.
pub const ENERGY_CLASS: [u8; 12] = [0, 1, 2, 3, 3, 4, 4, 5, 5, 5, 5, 5];

/// `(category, extra bit count, base value)` per token.
pub const EXTRA_BITS: [(usize, usize, i32); 11] = [
    (0, 0, 0), (0, 0, 1), (0, 0, 2), (0, 0, 3), (0, 0, 4),
    (0, 1, 5), (1, 2, 7), (2, 3, 11), (3, 4, 19), (4, 5, 35), (5, 14, 67),
];

pub const CAT_PROBS: [&[u8]; 6] = [
    &[159],
    &[165, 145],
    &[173, 148, 140],
    &[176, 155, 140, 135],
    &[180, 157, 141, 134, 130],
    &[254, 254, 254, 252, 249, 243, 230, 196, 177, 153, 140, 133, 130, 129],
];

// ─── Scans ───────────────────────────────────────────────────────────────────

pub const DEFAULT_SCAN_4X4: [u16; 16] = [
     0,  4,  1,  5,  8,  2, 12,  9,  3,  6, 13, 10,  7, 14, 11, 15,
];

pub const COL_SCAN_4X4: [u16; 16] = [
     0,  4,  8,  1, 12,  5,  9,  2, 13,  6, 10,  3,  7, 14, 11, 15,
];

pub const ROW_SCAN_4X4: [u16; 16] = [
     0,  1,  4,  2,  5,  3,  6,  8,  9,  7, 12, 10, 13, 11, 14, 15,
];

pub const DEFAULT_SCAN_8X8: [u16; 64] = [
     0,  8,  1, 16,  9,  2, 17, 24, 10,  3, 18, 25, 32, 11,  4, 26,
    33, 19, 40, 12, 34, 27,  5, 41, 20, 48, 13, 35, 42, 28, 21,  6,
    49, 56, 36, 43, 29,  7, 14, 50, 57, 44, 22, 37, 15, 51, 58, 30,
    45, 23, 52, 59, 38, 31, 60, 53, 46, 39, 61, 54, 47, 62, 55, 63,
];

pub const COL_SCAN_8X8: [u16; 64] = [
     0,  8, 16,  1, 24,  9, 32, 17,  2, 40, 25, 10, 33, 18, 48,  3,
    26, 41, 11, 56, 19, 34,  4, 49, 27, 42, 12, 35, 20, 57, 50, 28,
     5, 43, 13, 36, 58, 51, 21, 44,  6, 29, 59, 37, 14, 52, 22,  7,
    45, 60, 30, 15, 38, 53, 23, 46, 31, 61, 39, 54, 47, 62, 55, 63,
];

pub const ROW_SCAN_8X8: [u16; 64] = [
     0,  1,  2,  8,  9,  3, 16, 10,  4, 17, 11, 24,  5, 18, 25, 12,
    19, 26, 32,  6, 13, 20, 33, 27,  7, 34, 40, 21, 28, 41, 14, 35,
    48, 42, 29, 36, 49, 22, 43, 15, 56, 37, 50, 44, 30, 57, 23, 51,
    58, 45, 38, 52, 31, 59, 53, 46, 60, 39, 61, 47, 54, 55, 62, 63,
];

pub const DEFAULT_SCAN_16X16: [u16; 256] = [
      0,  16,   1,  32,  17,   2,  48,  33,  18,   3,  64,  34,  49,  19,  65,  80,
     50,   4,  35,  66,  20,  81,  96,  51,   5,  36,  82,  97,  67, 112,  21,  52,
     98,  37,  83, 113,   6,  68, 128,  53,  22,  99, 114,  84,   7, 129,  38,  69,
    100, 115, 144, 130,  85,  54,  23,   8, 145,  39,  70, 116, 101, 131, 160, 146,
     55,  86,  24,  71, 132, 117, 161,  40,   9, 102, 147, 176, 162,  87,  56,  25,
    133, 118, 177, 148,  72, 103,  41, 163,  10, 192, 178,  88,  57, 134, 149, 119,
     26, 164,  73, 104, 193,  42, 179, 208,  11, 135,  89, 165, 120, 150,  58, 194,
    180,  27,  74, 209, 105, 151, 136,  43,  90, 224, 166, 195, 181, 121, 210,  59,
     12, 152, 106, 167, 196,  75, 137, 225, 211, 240, 182, 122,  91,  28, 197,  13,
    226, 168, 183, 153,  44, 212, 138, 107, 241,  60,  29, 123, 198, 184, 227, 169,
    242,  76, 213, 154,  45,  92,  14, 199, 139,  61, 228, 214, 170, 185, 243, 108,
     77, 155,  30,  15, 200, 229, 124, 215, 244,  93,  46, 186, 171, 201, 109, 140,
    230,  62, 216, 245,  31, 125,  78, 156, 231,  47, 187, 202, 217,  94, 246, 141,
     63, 232, 172, 110, 247, 157,  79, 218, 203, 126, 233, 188, 248,  95, 173, 142,
    219, 111, 249, 234, 158, 127, 189, 204, 250, 235, 143, 174, 220, 205, 159, 251,
    190, 221, 175, 236, 237, 191, 206, 252, 222, 253, 207, 238, 223, 254, 239, 255,
];

pub const COL_SCAN_16X16: [u16; 256] = [
      0,  16,  32,  48,   1,  64,  17,  80,  33,  96,  49,   2,  65, 112,  18,  81,
     34, 128,  50,  97,   3,  66, 144,  19, 113,  35,  82, 160,  98,  51, 129,   4,
     67, 176,  20, 114, 145,  83,  36,  99, 130,  52, 192,   5, 161,  68, 115,  21,
    146,  84, 208, 177,  37, 131, 100,  53, 162, 224,  69,   6, 116, 193, 147,  85,
     22, 240, 132,  38, 178, 101, 163,  54, 209, 117,  70,   7, 148, 194,  86, 179,
    225,  23, 133,  39, 164,   8, 102, 210, 241,  55, 195, 118, 149,  71, 180,  24,
     87, 226, 134, 165, 211,  40, 103,  56,  72, 150, 196, 242, 119,   9, 181, 227,
     88, 166,  25, 135,  41, 104, 212,  57, 151, 197, 120,  73, 243, 182, 136, 167,
    213,  89,  10, 228, 105, 152, 198,  26,  42, 121, 183, 244, 168,  58, 137, 229,
     74, 214,  90, 153, 199, 184,  11, 106, 245,  27, 122, 230, 169,  43, 215,  59,
    200, 138, 185, 246,  75,  12,  91, 154, 216, 231, 107,  28,  44, 201, 123, 170,
     60, 247, 232,  76, 139,  13,  92, 217, 186, 248, 155, 108,  29, 124,  45, 202,
    233, 171,  61,  14,  77, 140,  15, 249,  93,  30, 187, 156, 218,  46, 109, 125,
     62, 172,  78, 203,  31, 141, 234,  94,  47, 188,  63, 157, 110, 250, 219,  79,
    126, 204, 173, 142,  95, 189, 111, 235, 158, 220, 251, 127, 174, 143, 205, 236,
    159, 190, 221, 252, 175, 206, 237, 191, 253, 222, 238, 207, 254, 223, 239, 255,
];

pub const ROW_SCAN_16X16: [u16; 256] = [
      0,   1,   2,  16,   3,  17,   4,  18,  32,   5,  33,  19,   6,  34,  48,  20,
     49,   7,  35,  21,  50,  64,   8,  36,  65,  22,  51,  37,  80,   9,  66,  52,
     23,  38,  81,  67,  10,  53,  24,  82,  68,  96,  39,  11,  54,  83,  97,  69,
     25,  98,  84,  40, 112,  55,  12,  70,  99, 113,  85,  26,  41,  56, 114, 100,
     13,  71, 128,  86,  27, 115, 101, 129,  42,  57,  72, 116,  14,  87, 130, 102,
    144,  73, 131, 117,  28,  58,  15,  88,  43, 145, 103, 132, 146, 118,  74, 160,
     89, 133, 104,  29,  59, 147, 119,  44, 161, 148,  90, 105, 134, 162, 120, 176,
     75, 135, 149,  30,  60, 163, 177,  45, 121,  91, 106, 164, 178, 150, 192, 136,
    165, 179,  31, 151, 193,  76, 122,  61, 137, 194, 107, 152, 180, 208,  46, 166,
    167, 195,  92, 181, 138, 209, 123, 153, 224, 196,  77, 168, 210, 182, 240, 108,
    197,  62, 154, 225, 183, 169, 211,  47, 139,  93, 184, 226, 212, 241, 198, 170,
    124, 155, 199,  78, 213, 185, 109, 227, 200,  63, 228, 242, 140, 214, 171, 186,
    156, 229, 243, 125,  94, 201, 244, 215, 216, 230, 141, 187, 202,  79, 172, 110,
    157, 245, 217, 231,  95, 246, 232, 126, 203, 247, 233, 173, 218, 142, 111, 158,
    188, 248, 127, 234, 219, 249, 189, 204, 143, 174, 159, 250, 235, 205, 220, 175,
    190, 251, 221, 191, 206, 236, 207, 237, 252, 222, 253, 223, 238, 239, 254, 255,
];

pub const DEFAULT_SCAN_32X32: [u16; 1024] = [
       0,   32,    1,   64,   33,    2,   96,   65,   34,  128,    3,   97,   66,  160,  129,   35,
      98,    4,   67,  130,  161,  192,   36,   99,  224,    5,  162,  193,   68,  131,   37,  100,
     225,  194,  256,  163,   69,  132,    6,  226,  257,  288,  195,  101,  164,   38,  258,    7,
     227,  289,  133,  320,   70,  196,  165,  290,  259,  228,   39,  321,  102,  352,    8,  197,
      71,  134,  322,  291,  260,  353,  384,  229,  166,  103,   40,  354,  323,  292,  135,  385,
     198,  261,   72,    9,  416,  167,  386,  355,  230,  324,  104,  293,   41,  417,  199,  136,
     262,  387,  448,  325,  356,   10,   73,  418,  231,  168,  449,  294,  388,  105,  419,  263,
      42,  200,  357,  450,  137,  480,   74,  326,  232,   11,  389,  169,  295,  420,  106,  451,
     481,  358,  264,  327,  201,   43,  138,  512,  482,  390,  296,  233,  170,  421,   75,  452,
     359,   12,  513,  265,  483,  328,  107,  202,  514,  544,  422,  391,  453,  139,   44,  234,
     484,  297,  360,  171,   76,  515,  545,  266,  329,  454,   13,  423,  203,  108,  546,  485,
     576,  298,  235,  140,  361,  330,  172,  547,   45,  455,  267,  577,  486,   77,  204,  362,
     608,   14,  299,  578,  109,  236,  487,  609,  331,  141,  579,   46,   15,  173,  610,  363,
      78,  205,   16,  110,  237,  611,  142,   47,  174,   79,  206,   17,  111,  238,   48,  143,
      80,  175,  112,  207,   49,   18,  239,   81,  113,   19,   50,   82,  114,   51,   83,  115,
     640,  516,  392,  268,  144,   20,  672,  641,  548,  517,  424,  393,  300,  269,  176,  145,
      52,   21,  704,  673,  642,  580,  549,  518,  456,  425,  394,  332,  301,  270,  208,  177,
     146,   84,   53,   22,  736,  705,  674,  643,  612,  581,  550,  519,  488,  457,  426,  395,
     364,  333,  302,  271,  240,  209,  178,  147,  116,   85,   54,   23,  737,  706,  675,  613,
     582,  551,  489,  458,  427,  365,  334,  303,  241,  210,  179,  117,   86,   55,  738,  707,
     614,  583,  490,  459,  366,  335,  242,  211,  118,   87,  739,  615,  491,  367,  243,  119,
     768,  644,  520,  396,  272,  148,   24,  800,  769,  676,  645,  552,  521,  428,  397,  304,
     273,  180,  149,   56,   25,  832,  801,  770,  708,  677,  646,  584,  553,  522,  460,  429,
     398,  336,  305,  274,  212,  181,  150,   88,   57,   26,  864,  833,  802,  771,  740,  709,
     678,  647,  616,  585,  554,  523,  492,  461,  430,  399,  368,  337,  306,  275,  244,  213,
     182,  151,  120,   89,   58,   27,  865,  834,  803,  741,  710,  679,  617,  586,  555,  493,
     462,  431,  369,  338,  307,  245,  214,  183,  121,   90,   59,  866,  835,  742,  711,  618,
     587,  494,  463,  370,  339,  246,  215,  122,   91,  867,  743,  619,  495,  371,  247,  123,
     896,  772,  648,  524,  400,  276,  152,   28,  928,  897,  804,  773,  680,  649,  556,  525,
     432,  401,  308,  277,  184,  153,   60,   29,  960,  929,  898,  836,  805,  774,  712,  681,
     650,  588,  557,  526,  464,  433,  402,  340,  309,  278,  216,  185,  154,   92,   61,   30,
     992,  961,  930,  899,  868,  837,  806,  775,  744,  713,  682,  651,  620,  589,  558,  527,
     496,  465,  434,  403,  372,  341,  310,  279,  248,  217,  186,  155,  124,   93,   62,   31,
     993,  962,  931,  869,  838,  807,  745,  714,  683,  621,  590,  559,  497,  466,  435,  373,
     342,  311,  249,  218,  187,  125,   94,   63,  994,  963,  870,  839,  746,  715,  622,  591,
     498,  467,  374,  343,  250,  219,  126,   95,  995,  871,  747,  623,  499,  375,  251,  127,
     900,  776,  652,  528,  404,  280,  156,  932,  901,  808,  777,  684,  653,  560,  529,  436,
     405,  312,  281,  188,  157,  964,  933,  902,  840,  809,  778,  716,  685,  654,  592,  561,
     530,  468,  437,  406,  344,  313,  282,  220,  189,  158,  996,  965,  934,  903,  872,  841,
     810,  779,  748,  717,  686,  655,  624,  593,  562,  531,  500,  469,  438,  407,  376,  345,
     314,  283,  252,  221,  190,  159,  997,  966,  935,  873,  842,  811,  749,  718,  687,  625,
     594,  563,  501,  470,  439,  377,  346,  315,  253,  222,  191,  998,  967,  874,  843,  750,
     719,  626,  595,  502,  471,  378,  347,  254,  223,  999,  875,  751,  627,  503,  379,  255,
     904,  780,  656,  532,  408,  284,  936,  905,  812,  781,  688,  657,  564,  533,  440,  409,
     316,  285,  968,  937,  906,  844,  813,  782,  720,  689,  658,  596,  565,  534,  472,  441,
     410,  348,  317,  286, 1000,  969,  938,  907,  876,  845,  814,  783,  752,  721,  690,  659,
     628,  597,  566,  535,  504,  473,  442,  411,  380,  349,  318,  287, 1001,  970,  939,  877,
     846,  815,  753,  722,  691,  629,  598,  567,  505,  474,  443,  381,  350,  319, 1002,  971,
     878,  847,  754,  723,  630,  599,  506,  475,  382,  351, 1003,  879,  755,  631,  507,  383,
     908,  784,  660,  536,  412,  940,  909,  816,  785,  692,  661,  568,  537,  444,  413,  972,
     941,  910,  848,  817,  786,  724,  693,  662,  600,  569,  538,  476,  445,  414, 1004,  973,
     942,  911,  880,  849,  818,  787,  756,  725,  694,  663,  632,  601,  570,  539,  508,  477,
     446,  415, 1005,  974,  943,  881,  850,  819,  757,  726,  695,  633,  602,  571,  509,  478,
     447, 1006,  975,  882,  851,  758,  727,  634,  603,  510,  479, 1007,  883,  759,  635,  511,
     912,  788,  664,  540,  944,  913,  820,  789,  696,  665,  572,  541,  976,  945,  914,  852,
     821,  790,  728,  697,  666,  604,  573,  542, 1008,  977,  946,  915,  884,  853,  822,  791,
     760,  729,  698,  667,  636,  605,  574,  543, 1009,  978,  947,  885,  854,  823,  761,  730,
     699,  637,  606,  575, 1010,  979,  886,  855,  762,  731,  638,  607, 1011,  887,  763,  639,
     916,  792,  668,  948,  917,  824,  793,  700,  669,  980,  949,  918,  856,  825,  794,  732,
     701,  670, 1012,  981,  950,  919,  888,  857,  826,  795,  764,  733,  702,  671, 1013,  982,
     951,  889,  858,  827,  765,  734,  703, 1014,  983,  890,  859,  766,  735, 1015,  891,  767,
     920,  796,  952,  921,  828,  797,  984,  953,  922,  860,  829,  798, 1016,  985,  954,  923,
     892,  861,  830,  799, 1017,  986,  955,  893,  862,  831, 1018,  987,  894,  863, 1019,  895,
     924,  956,  925,  988,  957,  926, 1020,  989,  958,  927, 1021,  990,  959, 1022,  991, 1023,
];

// ─── Mode probabilities ──────────────────────────────────────────────────────

/// Key frame luma mode probabilities, `[above_mode][left_mode]`.
pub const KF_Y_MODE_PROBS: [[[u8; 9]; 10]; 10] = [
    [
        [137,  30,  42, 148, 151, 207,  70,  52,  91],
        [ 92,  45, 102, 136, 116, 180,  74,  90, 100],
        [ 73,  32,  19, 187, 222, 215,  46,  34, 100],
        [ 91,  30,  32, 116, 121, 186,  93,  86,  94],
        [ 72,  35,  36, 149,  68, 206,  68,  63, 105],
        [ 73,  31,  28, 138,  57, 124,  55, 122, 151],
        [ 67,  23,  21, 140, 126, 197,  40,  37, 171],
        [ 86,  27,  28, 128, 154, 212,  45,  43,  53],
        [ 74,  32,  27, 107,  86, 160,  63, 134, 102],
        [ 59,  67,  44, 140, 161, 202,  78,  67, 119],
    ],
    [
        [ 63,  36, 126, 146, 123, 158,  60,  90,  96],
        [ 43,  46, 168, 134, 107, 128,  69, 142,  92],
        [ 44,  29,  68, 159, 201, 177,  50,  57,  77],
        [ 58,  38,  76, 114,  97, 172,  78, 133,  92],
        [ 46,  41,  76, 140,  63, 184,  69, 112,  57],
        [ 38,  32,  85, 140,  46, 112,  54, 151, 133],
        [ 39,  27,  61, 131, 110, 175,  44,  75, 136],
        [ 52,  30,  74, 113, 130, 175,  51,  64,  58],
        [ 47,  35,  80, 100,  74, 143,  64, 163,  74],
        [ 36,  61, 116, 114, 128, 162,  80, 125,  82],
    ],
    [
        [ 82,  26,  26, 171, 208, 204,  44,  32, 105],
        [ 55,  44,  68, 166, 179, 192,  57,  57, 108],
        [ 42,  26,  11, 199, 241, 228,  23,  15,  85],
        [ 68,  42,  19, 131, 160, 199,  55,  52,  83],
        [ 58,  50,  25, 139, 115, 232,  39,  52, 118],
        [ 50,  35,  33, 153, 104, 162,  64,  59, 131],
        [ 44,  24,  16, 150, 177, 202,  33,  19, 156],
        [ 55,  27,  12, 153, 203, 218,  26,  27,  49],
        [ 53,  49,  21, 110, 116, 168,  59,  80,  76],
        [ 38,  72,  19, 168, 203, 212,  50,  50, 107],
    ],
    [
        [103,  26,  36, 129, 132, 201,  83,  80,  93],
        [ 59,  38,  83, 112, 103, 162,  98, 136,  90],
        [ 62,  30,  23, 158, 200, 207,  59,  57,  50],
        [ 67,  30,  29,  84,  86, 191, 102,  91,  59],
        [ 60,  32,  33, 112,  71, 220,  64,  89, 104],
        [ 53,  26,  34, 130,  56, 149,  84, 120, 103],
        [ 53,  21,  23, 133, 109, 210,  56,  77, 172],
        [ 77,  19,  29, 112, 142, 228,  55,  66,  36],
        [ 61,  29,  29,  93,  97, 165,  83, 175, 162],
        [ 47,  47,  43, 114, 137, 181, 100,  99,  95],
    ],
    [
        [ 69,  23,  29, 128,  83, 199,  46,  44, 101],
        [ 53,  40,  55, 139,  69, 183,  61,  80, 110],
        [ 40,  29,  19, 161, 180, 207,  43,  24,  91],
        [ 60,  34,  19, 105,  61, 198,  53,  64,  89],
        [ 52,  31,  22, 158,  40, 209,  58,  62,  89],
        [ 44,  31,  29, 147,  46, 158,  56, 102, 198],
        [ 35,  19,  12, 135,  87, 209,  41,  45, 167],
        [ 55,  25,  21, 118,  95, 215,  38,  39,  66],
        [ 51,  38,  25, 113,  58, 164,  70,  93,  97],
        [ 47,  54,  34, 146, 108, 203,  72, 103, 151],
    ],
    [
        [ 64,  19,  37, 156,  66, 138,  49,  95, 133],
        [ 46,  27,  80, 150,  55, 124,  55, 121, 135],
        [ 36,  23,  27, 165, 149, 166,  54,  64, 118],
        [ 53,  21,  36, 131,  63, 163,  60, 109,  81],
        [ 40,  26,  35, 154,  40, 185,  51,  97, 123],
        [ 35,  19,  34, 179,  19,  97,  48, 129, 124],
        [ 36,  20,  26, 136,  62, 164,  33,  77, 154],
        [ 45,  18,  32, 130,  90, 157,  40,  79,  91],
        [ 45,  26,  28, 129,  45, 129,  49, 147, 123],
        [ 38,  44,  51, 136,  74, 162,  57,  97, 121],
    ],
    [
        [ 75,  17,  22, 136, 138, 185,  32,  34, 166],
        [ 56,  39,  58, 133, 117, 173,  48,  53, 187],
        [ 35,  21,  12, 161, 212, 207,  20,  23, 145],
        [ 56,  29,  19, 117, 109, 181,  55,  68, 112],
        [ 47,  29,  17, 153,  64, 220,  59,  51, 114],
        [ 46,  16,  24, 136,  76, 147,  41,  64, 172],
        [ 34,  17,  11, 108, 152, 187,  13,  15, 209],
        [ 51,  24,  14, 115, 133, 209,  32,  26, 104],
        [ 55,  30,  18, 122,  79, 179,  44,  88, 116],
        [ 37,  49,  25, 129, 168, 164,  41,  54, 148],
    ],
    [
        [ 82,  22,  32, 127, 143, 213,  39,  41,  70],
        [ 62,  44,  61, 123, 105, 189,  48,  57,  64],
        [ 47,  25,  17, 175, 222, 220,  24,  30,  86],
        [ 68,  36,  17, 106, 102, 206,  59,  74,  74],
        [ 57,  39,  23, 151,  68, 216,  55,  63,  58],
        [ 49,  30,  35, 141,  70, 168,  82,  40, 115],
        [ 51,  25,  15, 136, 129, 202,  38,  35, 139],
        [ 68,  26,  16, 111, 141, 215,  29,  28,  28],
        [ 59,  39,  19, 114,  75, 180,  77, 104,  42],
        [ 40,  61,  26, 126, 152, 206,  61,  59,  93],
    ],
    [
        [ 78,  23,  39, 111, 117, 170,  74, 124,  94],
        [ 48,  34,  86, 101,  92, 146,  78, 179, 134],
        [ 47,  22,  24, 138, 187, 178,  68,  69,  59],
        [ 56,  25,  33, 105, 112, 187,  95, 177, 129],
        [ 48,  31,  27, 114,  63, 183,  82, 116,  56],
        [ 43,  28,  37, 121,  63, 123,  61, 192, 169],
        [ 42,  17,  24, 109,  97, 177,  56,  76, 122],
        [ 58,  18,  28, 105, 139, 182,  70,  92,  63],
        [ 46,  23,  32,  74,  86, 150,  67, 183,  88],
        [ 36,  38,  48,  92, 122, 165,  88, 137,  91],
    ],
    [
        [ 65,  70,  60, 155, 159, 199,  61,  60,  81],
        [ 44,  78, 115, 132, 119, 173,  71, 112,  93],
        [ 39,  38,  21, 184, 227, 206,  42,  32,  64],
        [ 58,  47,  36, 124, 137, 193,  80,  82,  78],
        [ 49,  50,  35, 144,  95, 205,  63,  78,  59],
        [ 41,  53,  52, 148,  71, 142,  65, 128,  51],
        [ 40,  36,  28, 143, 143, 202,  40,  55, 137],
        [ 52,  34,  29, 129, 183, 227,  42,  35,  43],
        [ 42,  44,  44, 104, 105, 164,  64, 130,  80],
        [ 43,  81,  53, 140, 169, 204,  68,  84,  72],
    ],
];

/// Key frame chroma mode probabilities, indexed by luma mode.
pub const KF_UV_MODE_PROBS: [[u8; 9]; 10] = [
    [144,  11,  54, 157, 195, 130,  46,  58, 108],
    [118,  15, 123, 148, 131, 101,  44,  93, 131],
    [113,  12,  23, 188, 226, 142,  26,  32, 125],
    [120,  11,  50, 123, 163, 135,  64,  77, 103],
    [113,   9,  36, 155, 111, 157,  32,  44, 161],
    [116,   9,  55, 176,  76,  96,  37,  61, 149],
    [115,   9,  28, 141, 161, 167,  21,  25, 193],
    [120,  12,  32, 145, 195, 142,  32,  38,  86],
    [116,  12,  64, 120, 140, 125,  49, 115, 121],
    [102,  19,  66, 162, 182, 122,  35,  59, 128],
];

pub const DEFAULT_Y_MODE_PROBS: [[u8; 9]; 4] = [
    [ 65,  32,  18, 144, 162, 194,  41,  51,  98],
    [132,  68,  18, 165, 217, 196,  45,  40,  78],
    [173,  80,  19, 176, 240, 193,  64,  35,  46],
    [221, 135,  38, 194, 248, 121,  96,  85,  29],
];

pub const DEFAULT_UV_MODE_PROBS: [[u8; 9]; 10] = [
    [120,   7,  76, 176, 208, 126,  28,  54, 103],
    [ 48,  12, 154, 155, 139,  90,  34, 117, 119],
    [ 67,   6,  25, 204, 243, 158,  13,  21,  96],
    [ 97,   5,  44, 131, 176, 139,  48,  68,  97],
    [ 83,   5,  42, 156, 111, 152,  26,  49, 152],
    [ 80,   5,  58, 178,  74,  83,  33,  62, 145],
    [ 86,   5,  32, 154, 192, 168,  14,  22, 163],
    [ 85,   5,  32, 156, 216, 148,  19,  29,  73],
    [ 77,   7,  64, 116, 132, 122,  37, 126, 120],
    [101,  21, 107, 181, 192, 103,  19,  67, 125],
];

pub const DEFAULT_PARTITION_PROBS: [[u8; 3]; 16] = [
    [199, 122, 141],
    [147,  63, 159],
    [148, 133, 118],
    [121, 104, 114],
    [174,  73,  87],
    [ 92,  41,  83],
    [ 82,  99,  50],
    [ 53,  39,  39],
    [177,  58,  59],
    [ 68,  26,  63],
    [ 52,  79,  25],
    [ 17,  14,  12],
    [222,  34,  30],
    [ 72,  16,  44],
    [ 58,  32,  12],
    [ 10,   7,   6],
];

pub const KF_PARTITION_PROBS: [[u8; 3]; 16] = [
    [158,  97,  94],
    [ 93,  24,  99],
    [ 85, 119,  44],
    [ 62,  59,  67],
    [149,  53,  53],
    [ 94,  20,  48],
    [ 83,  53,  24],
    [ 52,  18,  18],
    [150,  40,  39],
    [ 78,  12,  26],
    [ 67,  33,  11],
    [ 24,   7,   5],
    [174,  35,  49],
    [ 68,  11,  27],
    [ 57,  15,   9],
    [ 12,   3,   3],
];

pub const DEFAULT_INTER_MODE_PROBS: [[u8; 3]; 7] = [
    [  2, 173,  34],
    [  7, 145,  85],
    [  7, 166,  63],
    [  7,  94,  66],
    [  8,  64,  46],
    [ 17,  81,  31],
    [ 25,  29,  30],
];

pub const DEFAULT_IS_INTER_PROBS: [u8; 4] = [9, 102, 187, 225];
pub const DEFAULT_COMP_MODE_PROBS: [u8; 5] = [239, 183, 119, 96, 41];
pub const DEFAULT_COMP_REF_PROBS: [u8; 5] = [50, 126, 123, 221, 226];
pub const DEFAULT_SINGLE_REF_PROBS: [[u8; 2]; 5] = [[33, 16], [77, 74], [142, 142], [172, 170], [238, 247]];
pub const DEFAULT_TX_PROBS_8X8: [[u8; 1]; 2] = [[100], [66]];
pub const DEFAULT_TX_PROBS_16X16: [[u8; 2]; 2] = [[20, 152], [15, 101]];
pub const DEFAULT_TX_PROBS_32X32: [[u8; 3]; 2] = [[3, 136, 37], [5, 52, 13]];
pub const DEFAULT_SKIP_PROBS: [u8; 3] = [192, 128, 64];
pub const DEFAULT_INTERP_FILTER_PROBS: [[u8; 2]; 4] = [[235, 162], [36, 255], [34, 3], [149, 144]];

// ─── Motion vector probabilities ─────────────────────────────────────────────

pub const DEFAULT_MV_JOINT_PROBS: [u8; 3] = [32, 64, 96];
pub const DEFAULT_MV_SIGN_PROBS: [u8; 2] = [128, 128];
pub const DEFAULT_MV_CLASS_PROBS: [[u8; 10]; 2] = [
    [224, 144, 192, 168, 192, 176, 192, 198, 198, 245],
    [216, 128, 176, 160, 176, 176, 192, 198, 198, 208],
];
pub const DEFAULT_MV_CLASS0_BIT_PROBS: [u8; 2] = [216, 208];
pub const DEFAULT_MV_BITS_PROBS: [[u8; 10]; 2] = [
    [136, 140, 148, 160, 176, 192, 224, 234, 234, 240],
    [136, 140, 148, 160, 176, 192, 224, 234, 234, 240],
];
pub const DEFAULT_MV_CLASS0_FR_PROBS: [[[u8; 3]; 2]; 2] = [
    [[128, 128,  64], [ 96, 112,  64]],
    [[128, 128,  64], [ 96, 112,  64]],
];
pub const DEFAULT_MV_FR_PROBS: [[u8; 3]; 2] = [[64, 96, 64], [64, 96, 64]];
pub const DEFAULT_MV_CLASS0_HP_PROBS: [u8; 2] = [160, 160];
pub const DEFAULT_MV_HP_PROBS: [u8; 2] = [128, 128];

// ─── Trees ───────────────────────────────────────────────────────────────────
//
// Binary trees in the usual packed form: a non-positive entry is a negated
// leaf value, a positive entry is the index of the next node pair.

pub type Tree = [i8];

pub const INTRA_MODE_TREE: [i8; 18] = [0, 2, -9, 4, -1, 6, 8, 12, -2, 10, -4, -5, -3, 14, -8, 16, -6, -7];
pub const SEGMENT_TREE: [i8; 14] = [2, 4, 6, 8, 10, 12, 0, -1, -2, -3, -4, -5, -6, -7];
/// Leaves are offsets from `NEARESTMV`.
pub const INTER_MODE_TREE: [i8; 6] = [-2, 2, 0, 4, -1, -3];
pub const PARTITION_TREE: [i8; 6] = [0, 2, -1, 4, -2, -3];
pub const INTERP_FILTER_TREE: [i8; 4] = [0, 2, -1, -2];
pub const MV_JOINT_TREE: [i8; 6] = [0, 2, -1, 4, -2, -3];
pub const MV_CLASS_TREE: [i8; 20] = [0, 2, -1, 4, 6, 8, -2, -3, 10, 12, -4, -5, -6, 14, 16, 18, -7, -8, -9, -10];
pub const MV_FR_TREE: [i8; 6] = [0, 2, -1, 4, -2, -3];
pub const TX_SIZE_8_TREE: [i8; 2] = [0, -1];
pub const TX_SIZE_16_TREE: [i8; 4] = [0, 2, -1, -2];
pub const TX_SIZE_32_TREE: [i8; 6] = [0, 2, -1, 4, -2, -3];
pub const BINARY_TREE: [i8; 2] = [0, -1];
/// Tokens from TWO upwards, read with one row of `PARETO_TABLE`.
pub const COEF_CON_TREE: [i8; 16] = [2, 6, -2, 4, -3, -4, 8, 10, -5, -6, 12, 14, -7, -8, -9, -10];

// ─── Probability deltas ──────────────────────────────────────────────────────

pub const INV_MAP_TABLE: [u8; 255] = [
      7,  20,  33,  46,  59,  72,  85,  98, 111, 124, 137, 150, 163, 176, 189,
    202, 215, 228, 241, 254,   1,   2,   3,   4,   5,   6,   8,   9,  10,  11,
     12,  13,  14,  15,  16,  17,  18,  19,  21,  22,  23,  24,  25,  26,  27,
     28,  29,  30,  31,  32,  34,  35,  36,  37,  38,  39,  40,  41,  42,  43,
     44,  45,  47,  48,  49,  50,  51,  52,  53,  54,  55,  56,  57,  58,  60,
     61,  62,  63,  64,  65,  66,  67,  68,  69,  70,  71,  73,  74,  75,  76,
     77,  78,  79,  80,  81,  82,  83,  84,  86,  87,  88,  89,  90,  91,  92,
     93,  94,  95,  96,  97,  99, 100, 101, 102, 103, 104, 105, 106, 107, 108,
    109, 110, 112, 113, 114, 115, 116, 117, 118, 119, 120, 121, 122, 123, 125,
    126, 127, 128, 129, 130, 131, 132, 133, 134, 135, 136, 138, 139, 140, 141,
    142, 143, 144, 145, 146, 147, 148, 149, 151, 152, 153, 154, 155, 156, 157,
    158, 159, 160, 161, 162, 164, 165, 166, 167, 168, 169, 170, 171, 172, 173,
    174, 175, 177, 178, 179, 180, 181, 182, 183, 184, 185, 186, 187, 188, 190,
    191, 192, 193, 194, 195, 196, 197, 198, 199, 200, 201, 203, 204, 205, 206,
    207, 208, 209, 210, 211, 212, 213, 214, 216, 217, 218, 219, 220, 221, 222,
    223, 224, 225, 226, 227, 229, 230, 231, 232, 233, 234, 235, 236, 237, 238,
    239, 240, 242, 243, 244, 245, 246, 247, 248, 249, 250, 251, 252, 253, 253,
];

// ─── Motion vector reference search ──────────────────────────────────────────

/// Candidate neighbour offsets `(row, col)` in 8x8 units, per block size.
pub const MV_REF_BLOCKS: [[(i32, i32); 8]; 13] = [
    [(-1,  0), ( 0, -1), (-1, -1), (-2,  0), ( 0, -2), (-2, -1), (-1, -2), (-2, -2)],
    [(-1,  0), ( 0, -1), (-1, -1), (-2,  0), ( 0, -2), (-2, -1), (-1, -2), (-2, -2)],
    [(-1,  0), ( 0, -1), (-1, -1), (-2,  0), ( 0, -2), (-2, -1), (-1, -2), (-2, -2)],
    [(-1,  0), ( 0, -1), (-1, -1), (-2,  0), ( 0, -2), (-2, -1), (-1, -2), (-2, -2)],
    [( 0, -1), (-1,  0), ( 1, -1), (-1, -1), ( 0, -2), (-2,  0), (-2, -1), (-1, -2)],
    [(-1,  0), ( 0, -1), (-1,  1), (-1, -1), (-2,  0), ( 0, -2), (-1, -2), (-2, -1)],
    [(-1,  0), ( 0, -1), (-1,  1), ( 1, -1), (-1, -1), (-3,  0), ( 0, -3), (-3, -3)],
    [( 0, -1), (-1,  0), ( 2, -1), (-1, -1), (-1,  1), ( 0, -3), (-3,  0), (-3, -3)],
    [(-1,  0), ( 0, -1), (-1,  2), (-1, -1), ( 1, -1), (-3,  0), ( 0, -3), (-3, -3)],
    [(-1,  1), ( 1, -1), (-1,  2), ( 2, -1), (-1, -1), (-3,  0), ( 0, -3), (-3, -3)],
    [( 0, -1), (-1,  0), ( 4, -1), (-1,  2), (-1, -1), ( 0, -3), (-3,  0), ( 2, -1)],
    [(-1,  0), ( 0, -1), (-1,  4), ( 2, -1), (-1, -1), (-3,  0), ( 0, -3), (-1,  2)],
    [(-1,  3), ( 3, -1), (-1,  4), ( 4, -1), (-1, -1), (-1,  0), ( 0, -1), (-1,  6)],
];

/// Weight each neighbouring prediction mode adds to the inter mode context.
pub const MODE_2_COUNTER: [usize; 14] = [9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 0, 0, 3, 1];
pub const COUNTER_TO_CONTEXT: [usize; 19] = [2, 3, 4, 1, 3, 9, 0, 9, 9, 5, 5, 9, 5, 9, 9, 9, 9, 9, 6];

// ─── Interpolation kernels ───────────────────────────────────────────────────

/// 8-tap sub-pixel kernels, `[filter][fraction][tap]`, in the order regular,
/// smooth, sharp, bilinear.
pub const SUBPEL_FILTERS: [[[i32; 8]; 16]; 4] = [
    [
        [   0,    0,    0,  128,    0,    0,    0,    0],
        [   0,    1,   -5,  126,    8,   -3,    1,    0],
        [  -1,    3,  -10,  122,   18,   -6,    2,    0],
        [  -1,    4,  -13,  118,   27,   -9,    3,   -1],
        [  -1,    4,  -16,  112,   37,  -11,    4,   -1],
        [  -1,    5,  -18,  105,   48,  -14,    4,   -1],
        [  -1,    5,  -19,   97,   58,  -16,    5,   -1],
        [  -1,    6,  -19,   88,   68,  -18,    5,   -1],
        [  -1,    6,  -19,   78,   78,  -19,    6,   -1],
        [  -1,    5,  -18,   68,   88,  -19,    6,   -1],
        [  -1,    5,  -16,   58,   97,  -19,    5,   -1],
        [  -1,    4,  -14,   48,  105,  -18,    5,   -1],
        [  -1,    4,  -11,   37,  112,  -16,    4,   -1],
        [  -1,    3,   -9,   27,  118,  -13,    4,   -1],
        [   0,    2,   -6,   18,  122,  -10,    3,   -1],
        [   0,    1,   -3,    8,  126,   -5,    1,    0],
    ],
    [
        [   0,    0,    0,  128,    0,    0,    0,    0],
        [  -3,   -1,   32,   64,   38,    1,   -3,    0],
        [  -2,   -2,   29,   63,   41,    2,   -3,    0],
        [  -2,   -2,   26,   63,   43,    4,   -4,    0],
        [  -2,   -3,   24,   62,   46,    5,   -4,    0],
        [  -2,   -3,   21,   60,   49,    7,   -4,    0],
        [  -1,   -4,   18,   59,   51,    9,   -4,    0],
        [  -1,   -4,   16,   57,   53,   12,   -4,   -1],
        [  -1,   -4,   14,   55,   55,   14,   -4,   -1],
        [  -1,   -4,   12,   53,   57,   16,   -4,   -1],
        [   0,   -4,    9,   51,   59,   18,   -4,   -1],
        [   0,   -4,    7,   49,   60,   21,   -3,   -2],
        [   0,   -4,    5,   46,   62,   24,   -3,   -2],
        [   0,   -4,    4,   43,   63,   26,   -2,   -2],
        [   0,   -3,    2,   41,   63,   29,   -2,   -2],
        [   0,   -3,    1,   38,   64,   32,   -1,   -3],
    ],
    [
        [   0,    0,    0,  128,    0,    0,    0,    0],
        [  -1,    3,   -7,  127,    8,   -3,    1,    0],
        [  -2,    5,  -13,  125,   17,   -6,    3,   -1],
        [  -3,    7,  -17,  121,   27,  -10,    5,   -2],
        [  -4,    9,  -20,  115,   37,  -13,    6,   -2],
        [  -4,   10,  -23,  108,   48,  -16,    8,   -3],
        [  -4,   10,  -24,  100,   59,  -19,    9,   -3],
        [  -4,   11,  -24,   90,   70,  -21,   10,   -4],
        [  -4,   11,  -23,   80,   80,  -23,   11,   -4],
        [  -4,   10,  -21,   70,   90,  -24,   11,   -4],
        [  -3,    9,  -19,   59,  100,  -24,   10,   -4],
        [  -3,    8,  -16,   48,  108,  -23,   10,   -4],
        [  -2,    6,  -13,   37,  115,  -20,    9,   -4],
        [  -2,    5,  -10,   27,  121,  -17,    7,   -3],
        [  -1,    3,   -6,   17,  125,  -13,    5,   -2],
        [   0,    1,   -3,    8,  127,   -7,    3,   -1],
    ],
    [
        [   0,    0,    0,  128,    0,    0,    0,    0],
        [   0,    0,    0,  120,    8,    0,    0,    0],
        [   0,    0,    0,  112,   16,    0,    0,    0],
        [   0,    0,    0,  104,   24,    0,    0,    0],
        [   0,    0,    0,   96,   32,    0,    0,    0],
        [   0,    0,    0,   88,   40,    0,    0,    0],
        [   0,    0,    0,   80,   48,    0,    0,    0],
        [   0,    0,    0,   72,   56,    0,    0,    0],
        [   0,    0,    0,   64,   64,    0,    0,    0],
        [   0,    0,    0,   56,   72,    0,    0,    0],
        [   0,    0,    0,   48,   80,    0,    0,    0],
        [   0,    0,    0,   40,   88,    0,    0,    0],
        [   0,    0,    0,   32,   96,    0,    0,    0],
        [   0,    0,    0,   24,  104,    0,    0,    0],
        [   0,    0,    0,   16,  112,    0,    0,    0],
        [   0,    0,    0,    8,  120,    0,    0,    0],
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(scan: &[u16]) -> bool {
        let mut seen = vec![false; scan.len()];
        for &pos in scan {
            let pos = pos as usize;
            if pos >= seen.len() || seen[pos] { return false; }
            seen[pos] = true;
        }
        true
    }

    #[test]
    fn test_scans_are_permutations() {
        assert!(is_permutation(&DEFAULT_SCAN_4X4));
        assert!(is_permutation(&COL_SCAN_4X4));
        assert!(is_permutation(&ROW_SCAN_4X4));
        assert!(is_permutation(&DEFAULT_SCAN_8X8));
        assert!(is_permutation(&COL_SCAN_8X8));
        assert!(is_permutation(&ROW_SCAN_8X8));
        assert!(is_permutation(&DEFAULT_SCAN_16X16));
        assert!(is_permutation(&COL_SCAN_16X16));
        assert!(is_permutation(&ROW_SCAN_16X16));
        assert!(is_permutation(&DEFAULT_SCAN_32X32));
    }

    #[test]
    fn test_subpel_kernels_have_unit_gain() {
        for filter in SUBPEL_FILTERS.iter() {
            for kernel in filter.iter() {
                assert_eq!(kernel.iter().sum::<i32>(), 128);
            }
        }
    }

    #[test]
    fn test_quantizer_tables_are_monotonic() {
        for table in DC_QLOOKUP.iter().chain(AC_QLOOKUP.iter()) {
            assert_eq!(table[0], 4);
            assert!(table.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_inv_map_table_covers_every_probability() {
        let mut seen = [false; 256];
        for &v in INV_MAP_TABLE.iter() { seen[v as usize] = true; }
        assert!(seen[1..255].iter().all(|&s| s));
        assert!(!seen[0]);
    }
}
